use tokio::sync::broadcast;
use tracing::debug;

/// Publish/subscribe primitive announcing changes to every context
#[derive(Debug, Clone)]
pub struct MessageBus<T: Clone> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone> MessageBus<T> {
    /// # Arguments
    /// * `capacity` - Messages retained for slow subscribers before they lag
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<T> {
        self.sender.subscribe()
    }

    /// Publishes `payload`, returning how many subscribers received it
    pub fn send_to_all(&self, payload: T) -> usize {
        match self.sender.send(payload) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("No subscribers for notification");
                0
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<T: Clone> Default for MessageBus<T> {
    fn default() -> Self {
        Self::new(64)
    }
}
