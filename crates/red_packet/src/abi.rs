//! Red packet contract interface

use alloy_sol_types::sol;
use mask_contract::{Address, B256, U256};

sol! {
    interface HappyRedPacket {
        #[derive(Debug, PartialEq, Eq)]
        function create_red_packet(
            address _public_key,
            uint256 _number,
            bool _ifrandom,
            uint256 _duration,
            bytes32 _seed,
            string _message,
            string _name,
            uint256 _token_type,
            address _token_addr,
            uint256 _total_tokens
        ) external payable;

        /// Emitted once a red packet is stored on chain
        #[derive(Debug, PartialEq, Eq)]
        event CreationSuccess(
            uint256 total,
            bytes32 id,
            string name,
            string message,
            address indexed creator,
            uint256 creation_time,
            address token_address,
            uint256 number,
            bool ifrandom,
            uint256 duration
        );
    }
}

pub use HappyRedPacket::{create_red_packetCall, CreationSuccess};

/// Fields of `CreationSuccess` the plugin keeps after a creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creation {
    pub id: B256,
    pub creator: Address,
    pub token_address: Address,
    pub creation_time: U256,
    pub total: U256,
}

impl From<&CreationSuccess> for Creation {
    fn from(event: &CreationSuccess) -> Self {
        Self {
            id: event.id,
            creator: event.creator,
            token_address: event.token_address,
            creation_time: event.creation_time,
            total: event.total,
        }
    }
}
