use flume::{Receiver, Sender};

/// Queue of one-off events (toasts, alerts) emitted by state owners.
///
/// Unlike [`crate::StateCell`], every event is delivered exactly once: receivers
/// compete for events, so a single presentation adapter should drain the queue.
#[derive(Debug)]
pub struct Notifier<E> {
    send: Sender<E>,
    recv: Receiver<E>,
}

impl<E> Default for Notifier<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Notifier<E> {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self { send, recv }
    }

    pub fn notify(&self, event: E) {
        // The notifier keeps its own receiver alive, so the channel cannot disconnect.
        if self.send.send(event).is_err() {
            log::warn!("Notifier: event dropped, channel disconnected");
        }
    }

    pub fn receiver(&self) -> Receiver<E> {
        self.recv.clone()
    }

    /// Take every queued event without waiting.
    pub fn drain(&self) -> Vec<E> {
        self.recv.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_returns_events_in_order() {
        let notifier = Notifier::new();
        notifier.notify("first");
        notifier.notify("second");

        assert_eq!(notifier.drain(), vec!["first", "second"]);
        assert!(notifier.drain().is_empty());
    }

    #[test]
    fn each_event_is_delivered_once() {
        let notifier = Notifier::new();
        let receiver = notifier.receiver();
        notifier.notify(1_u8);

        assert_eq!(receiver.try_recv().ok(), Some(1));
        assert!(notifier.drain().is_empty());
    }

    #[tokio::test]
    async fn receiver_wakes_for_events_from_another_task() {
        let notifier = std::sync::Arc::new(Notifier::new());
        let receiver = notifier.receiver();

        let producer = notifier.clone();
        tokio::spawn(async move {
            producer.notify(42_u32);
        });

        let event = receiver.recv_async().await.expect("sender alive");
        assert_eq!(event, 42);
    }
}
