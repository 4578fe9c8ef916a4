use std::future::Future;

use tokio::sync::broadcast;
use tracing::warn;

use nuts_types::events::{FrameContext, HostEvent};

/// Why the host refused to add the frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddFrameError {
    #[error("{0}")]
    RejectedByUser(String),

    #[error("{0}")]
    InvalidDomainManifest(String),

    #[error("{0}")]
    Other(String),
}

impl AddFrameError {
    /// Text shown next to the add prompt.
    pub fn display_result(&self) -> String {
        match self {
            Self::RejectedByUser(msg) | Self::InvalidDomainManifest(msg) => {
                format!("Not added: {}", msg)
            }
            Self::Other(msg) => format!("Error: {}", msg),
        }
    }
}

/// The social client the frame is embedded in.
pub trait HostRuntime: Send + Sync {
    /// Viewer and client context. `None` when the host never provided one.
    fn context(&self) -> impl Future<Output = Option<FrameContext>> + Send;

    /// Listen for lifecycle events until the returned handle is dropped.
    fn subscribe(&self) -> Subscription;

    /// Ask the user to add this frame to their client.
    fn add_frame(&self) -> impl Future<Output = Result<(), AddFrameError>> + Send;

    /// Tell the host the UI can be shown.
    fn ready(&self);
}

/// Fan-out of host lifecycle events to any number of listeners.
#[derive(Clone)]
pub struct HostEvents {
    tx: broadcast::Sender<HostEvent>,
}

impl HostEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self { tx }
    }

    /// Deliver an event to current listeners. Returns how many received it.
    pub fn emit(&self, event: HostEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription {
            rx: self.tx.subscribe(),
        }
    }

    /// Live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for HostEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered listener. Dropping it unregisters.
pub struct Subscription {
    rx: broadcast::Receiver<HostEvent>,
}

impl Subscription {
    /// Next event, or `None` once every `HostEvents` handle is gone.
    pub async fn recv(&mut self) -> Option<HostEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("Host event listener lagged by {} events", n);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Explicit form of dropping the handle.
    pub fn unsubscribe(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn delivers_to_every_listener() {
        let events = HostEvents::new();
        let mut a = events.subscribe();
        let mut b = events.subscribe();

        assert_eq!(events.emit(HostEvent::FrameRemoved), 2);
        assert_eq!(a.recv().await, Some(HostEvent::FrameRemoved));
        assert_eq!(b.recv().await, Some(HostEvent::FrameRemoved));
    }

    #[test]
    fn dropping_a_subscription_releases_it() {
        let events = HostEvents::new();
        assert_eq!(events.listener_count(), 0);

        let first = events.subscribe();
        {
            let _scoped = events.subscribe();
            assert_eq!(events.listener_count(), 2);
        }
        assert_eq!(events.listener_count(), 1);

        first.unsubscribe();
        assert_eq!(events.listener_count(), 0);
        assert_eq!(events.emit(HostEvent::PrimaryButtonClicked), 0);
    }

    #[tokio::test]
    async fn closes_when_bus_is_dropped() {
        let events = HostEvents::new();
        let mut sub = events.subscribe();
        events.emit(HostEvent::NotificationsDisabled);
        drop(events);

        assert_eq!(sub.recv().await, Some(HostEvent::NotificationsDisabled));
        assert_eq!(sub.recv().await, None);
    }

    #[test]
    fn add_frame_errors_render_like_the_prompt() {
        assert_eq!(
            AddFrameError::RejectedByUser("user said no".into()).display_result(),
            "Not added: user said no"
        );
        assert_eq!(
            AddFrameError::InvalidDomainManifest("bad manifest".into()).display_result(),
            "Not added: bad manifest"
        );
        assert_eq!(AddFrameError::Other("timeout".into()).display_result(), "Error: timeout");
    }
}
