//! Submission lifecycle of the red packet creation pipeline

mod support;

use mask_contract::{
    ContractCaller, ContractError, TransactionInfo, TransactionReceipt, U256,
};
use mask_red_packet::{
    CreatePipeline, Derivation, PipelineError, TransactionState, ValidationError,
};
use std::sync::Arc;
use std::time::Duration;
use support::*;
use tokio::sync::watch;

async fn wait_for<F>(states: &mut watch::Receiver<TransactionState>, predicate: F) -> TransactionState
where
    F: Fn(&TransactionState) -> bool,
{
    let state = tokio::time::timeout(Duration::from_secs(5), states.wait_for(|s| predicate(s)))
        .await
        .expect("state change timed out")
        .expect("pipeline dropped");
    state.clone()
}

async fn ready_pipeline(contract: Arc<MockContract>) -> Arc<CreatePipeline> {
    let pipeline = CreatePipeline::new(settings("100", 5), context());
    let derivation = pipeline
        .set_contract(Some(contract as Arc<dyn ContractCaller>))
        .await;
    assert!(matches!(derivation, Derivation::Ready(_)));
    Arc::new(pipeline)
}

#[tokio::test]
async fn test_end_to_end_native_red_packet() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let mut states = pipeline.subscribe();

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });

    let sender = contract.sender().await;
    let (call, config) = contract.sent.lock()[0].clone();
    assert_eq!(call.name(), "create_red_packet");
    assert_eq!(config.value, U256::from(100));
    assert_eq!(config.gas, Some(210_000));
    assert_eq!(config.from, ACCOUNT);

    let tx_hash = hash("abc");
    sender.transaction_hash(tx_hash);
    let state = wait_for(&mut states, |s| s.pending_hash().is_some()).await;
    assert_eq!(state, TransactionState::WaitingForConfirmation { hash: Some(tx_hash) });

    let receipt = TransactionReceipt {
        transaction_hash: tx_hash,
        block_number: 10,
        status: true,
        ..Default::default()
    };
    sender.confirmation(1, receipt.clone());
    submission.await.unwrap().unwrap();

    assert_eq!(pipeline.state(), TransactionState::Confirmed { no: 1, receipt });
    assert_eq!(pipeline.create_settings().map(|s| s.total), Some("100".to_string()));
}

#[tokio::test]
async fn test_receipt_confirms_with_zero_count_before_resolution() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let mut states = pipeline.subscribe();

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    sender.receipt(TransactionReceipt::default());

    let state = wait_for(&mut states, TransactionState::is_terminal).await;
    assert!(matches!(state, TransactionState::Confirmed { no: 0, .. }));
    assert!(!submission.is_finished());

    sender.confirmation(3, TransactionReceipt::default());
    submission.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_submission_error_fails_and_rejects() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    sender.transaction_hash(hash("1"));
    sender.error(ContractError::Rejected("User denied transaction signature.".into()));

    let error = submission.await.unwrap().unwrap_err();
    assert_eq!(
        error,
        PipelineError::Submission(ContractError::Rejected("User denied transaction signature.".into()))
    );
    assert!(matches!(pipeline.state(), TransactionState::Failed { .. }));
}

#[tokio::test]
async fn test_event_stream_ending_early_is_a_failure() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    contract.senders.lock().clear();
    drop(sender);

    assert_eq!(
        submission.await.unwrap(),
        Err(PipelineError::Submission(ContractError::Dropped))
    );
}

#[tokio::test]
async fn test_estimation_error_surfaces_on_submit() {
    let contract = Arc::new(MockContract::failing_estimate("execution reverted"));
    let pipeline = CreatePipeline::new(settings("100", 5), context());

    let derivation = pipeline.set_contract(Some(contract.clone())).await;
    let prepared = derivation.prepared().expect("derivation still succeeds");
    assert!(prepared.gas.is_none());
    assert_eq!(pipeline.state(), TransactionState::Unknown);

    pipeline.create().await.unwrap();
    assert_eq!(
        pipeline.state(),
        TransactionState::Failed {
            error: PipelineError::Estimation(ContractError::Estimation("execution reverted".into()))
        }
    );
    assert_eq!(contract.sent_count(), 0);
}

#[tokio::test]
async fn test_missing_contract_resets_to_unknown() {
    let pipeline = CreatePipeline::new(settings("100", 5), context());
    assert_eq!(pipeline.refresh_params().await, Derivation::Unavailable);

    pipeline.create().await.unwrap();
    assert_eq!(pipeline.state(), TransactionState::Unknown);
    assert!(pipeline.create_settings().is_none());
}

#[tokio::test]
async fn test_missing_token_is_unavailable() {
    let contract = Arc::new(MockContract::new());
    let mut without_token = settings("100", 5);
    without_token.token = None;
    let pipeline = CreatePipeline::new(without_token, context());

    assert_eq!(pipeline.set_contract(Some(contract.clone())).await, Derivation::Unavailable);
    pipeline.create().await.unwrap();
    assert_eq!(pipeline.state(), TransactionState::Unknown);
    assert_eq!(contract.sent_count(), 0);
}

#[tokio::test]
async fn test_invalid_settings_fail_without_submitting() {
    let contract = Arc::new(MockContract::new());
    let pipeline = CreatePipeline::new(settings("3", 5), context());
    pipeline.set_contract(Some(contract.clone())).await;

    assert_eq!(
        pipeline.state(),
        TransactionState::Failed {
            error: PipelineError::Validation(ValidationError::InsufficientTotal)
        }
    );
    pipeline.create().await.unwrap();
    assert_eq!(contract.sent_count(), 0);
}

#[tokio::test]
async fn test_reset_leaves_outstanding_submission_running() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let mut states = pipeline.subscribe();

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    sender.confirmation(1, TransactionReceipt::default());
    submission.await.unwrap().unwrap();
    assert!(pipeline.state().is_terminal());

    pipeline.reset();
    assert_eq!(pipeline.state(), TransactionState::Unknown);

    // the handle keeps reporting confirmations after the reset
    assert!(sender.confirmation(2, TransactionReceipt::default()));
    let state = wait_for(&mut states, |s| matches!(s, TransactionState::Confirmed { no: 2, .. })).await;
    assert!(state.is_terminal());
}

#[tokio::test]
async fn test_reset_after_failure() {
    let pipeline = CreatePipeline::new(settings("100", 0), context());
    pipeline
        .set_contract(Some(Arc::new(MockContract::new())))
        .await;
    assert!(matches!(pipeline.state(), TransactionState::Failed { .. }));

    pipeline.reset();
    assert_eq!(pipeline.state(), TransactionState::Unknown);
}

#[tokio::test]
async fn test_only_latest_derivation_is_retained() {
    let contract = Arc::new(MockContract::new());
    let (release, gate) = tokio::sync::oneshot::channel();
    *contract.estimate_gate.lock() = Some(gate);

    let pipeline = Arc::new(CreatePipeline::new(settings("100", 5), context()));
    let slow = tokio::spawn({
        let pipeline = pipeline.clone();
        let contract = contract.clone();
        async move { pipeline.set_contract(Some(contract)).await }
    });

    // wait until the first derivation sits in its gas estimate
    while contract.estimate_gate.lock().is_some() {
        tokio::task::yield_now().await;
    }

    let mut renamed = settings("100", 5);
    renamed.name = "Second".to_string();
    let fresh = pipeline.set_settings(renamed).await;
    assert_eq!(fresh.prepared().map(|p| p.params.name.as_str()), Some("Second"));

    release.send(()).unwrap();
    let stale = slow.await.unwrap();
    assert_eq!(stale.prepared().map(|p| p.params.name.as_str()), Some("Mask"));

    let retained = pipeline.derivation();
    assert_eq!(retained.prepared().map(|p| p.params.name.as_str()), Some("Second"));
}

#[tokio::test]
async fn test_speed_up_reconciliation_confirms_from_replacement_receipt() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let chain = MockChain::at(100);
    assert_eq!(pipeline.track(&chain).await.unwrap(), 100);

    let replacement = hash("def");
    let receipt = TransactionReceipt {
        transaction_hash: replacement,
        block_number: 101,
        status: true,
        logs: vec![
            creation_log(ACCOUNT, ACCOUNT, 1),
            creation_log(CONTRACT, ACCOUNT, 100),
        ],
        ..Default::default()
    };
    chain.mine(
        TransactionInfo {
            hash: replacement,
            from: ACCOUNT,
            to: Some(CONTRACT),
            nonce: 7,
            input: create_input(PUBLIC_KEY),
            block_number: 101,
        },
        Some(receipt),
    );

    assert!(pipeline.reconcile_speed_up(&chain, replacement).await.unwrap());
    match pipeline.state() {
        TransactionState::Confirmed { no, receipt } => {
            assert_eq!(no, 0);
            assert_eq!(receipt.transaction_hash, replacement);
            assert!(receipt.status);
        }
        other => panic!("unexpected state {:?}", other),
    }

    // the log of the other emitter is ignored
    let creation = pipeline.creation().unwrap();
    assert_eq!(creation.creator, ACCOUNT);
    assert_eq!(creation.total, U256::from(100));
    assert_eq!(creation.id, CREATION_ID);
    assert_eq!(creation.token_address, NATIVE);
    assert_eq!(creation.creation_time, U256::from(CREATION_TIME));
}

#[tokio::test]
async fn test_speed_up_without_contract_log_keeps_waiting() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let chain = MockChain::at(5);

    let replacement = hash("fed");
    chain.mine(
        TransactionInfo {
            hash: replacement,
            from: ACCOUNT,
            to: Some(CONTRACT),
            nonce: 1,
            input: create_input(PUBLIC_KEY),
            block_number: 6,
        },
        Some(TransactionReceipt {
            transaction_hash: replacement,
            logs: vec![creation_log(ACCOUNT, ACCOUNT, 1)],
            ..Default::default()
        }),
    );

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    sender.transaction_hash(hash("1"));
    let mut states = pipeline.subscribe();
    wait_for(&mut states, |s| s.pending_hash().is_some()).await;

    assert!(!pipeline.reconcile_speed_up(&chain, replacement).await.unwrap());
    assert!(!pipeline.reconcile_speed_up(&chain, hash("404")).await.unwrap());
    assert_eq!(pipeline.state().pending_hash(), Some(hash("1")));

    sender.confirmation(1, TransactionReceipt::default());
    submission.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_monitor_finds_replacement_after_baseline() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let chain = Arc::new(MockChain::at(20));
    pipeline.track(chain.as_ref()).await.unwrap();

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    let pending = hash("aaa");
    sender.transaction_hash(pending);
    let mut states = pipeline.subscribe();
    wait_for(&mut states, |s| s.pending_hash().is_some()).await;

    // the original submission and a transaction for another red packet
    for (tx_hash, public_key) in [(pending, PUBLIC_KEY), (hash("bbb"), ACCOUNT)] {
        chain.mine(
            TransactionInfo {
                hash: tx_hash,
                from: ACCOUNT,
                to: Some(CONTRACT),
                nonce: 3,
                input: create_input(public_key),
                block_number: 21,
            },
            None,
        );
    }
    let replacement = hash("ccc");
    chain.mine(
        TransactionInfo {
            hash: replacement,
            from: ACCOUNT,
            to: Some(CONTRACT),
            nonce: 3,
            input: create_input(PUBLIC_KEY),
            block_number: 22,
        },
        Some(TransactionReceipt {
            transaction_hash: replacement,
            block_number: 22,
            logs: vec![creation_log(CONTRACT, ACCOUNT, 100)],
            ..Default::default()
        }),
    );

    let monitor = pipeline.spawn_speed_up_monitor(chain.clone(), Duration::from_millis(10));
    let state = wait_for(&mut states, TransactionState::is_terminal).await;
    match state {
        TransactionState::Confirmed { receipt, .. } => assert_eq!(receipt.transaction_hash, replacement),
        other => panic!("unexpected state {:?}", other),
    }
    tokio::time::timeout(Duration::from_secs(5), monitor)
        .await
        .unwrap()
        .unwrap();

    // the original handle is still outstanding
    assert!(!submission.is_finished());
    submission.abort();
}

#[tokio::test]
async fn test_monitor_stops_once_creation_is_confirmed() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let chain = Arc::new(MockChain::at(30));
    pipeline.track(chain.as_ref()).await.unwrap();

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    sender.transaction_hash(hash("abc"));
    let mut states = pipeline.subscribe();
    wait_for(&mut states, |s| s.pending_hash().is_some()).await;

    let monitor = pipeline.spawn_speed_up_monitor(chain.clone(), Duration::from_millis(5));
    sender.confirmation(1, TransactionReceipt::default());
    submission.await.unwrap().unwrap();
    assert!(pipeline.creation().is_none());

    tokio::time::timeout(Duration::from_secs(5), monitor)
        .await
        .expect("monitor kept polling after confirmation")
        .unwrap();
}

#[tokio::test]
async fn test_monitor_stops_once_creation_failed() {
    let contract = Arc::new(MockContract::new());
    let pipeline = ready_pipeline(contract.clone()).await;
    let chain = Arc::new(MockChain::at(30));
    pipeline.track(chain.as_ref()).await.unwrap();

    let submission = tokio::spawn({
        let pipeline = pipeline.clone();
        async move { pipeline.create().await }
    });
    let sender = contract.sender().await;
    let monitor = pipeline.spawn_speed_up_monitor(chain.clone(), Duration::from_millis(5));
    sender.error(ContractError::Rejected("User denied transaction signature.".into()));
    assert!(submission.await.unwrap().is_err());

    tokio::time::timeout(Duration::from_secs(5), monitor)
        .await
        .expect("monitor kept polling after failure")
        .unwrap();
}
