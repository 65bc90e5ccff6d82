//! Typed recorder events and their subscription registry.
//!
//! Events are dispatched synchronously at the point of the corresponding
//! mutation: each subscriber holds a channel receiver, and once a
//! subscription is removed no further events reach it.

use crate::recorder::RecorderState;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;

/// Events emitted by the recorder.
#[derive(Clone, Debug, PartialEq)]
pub enum RecorderEvent {
    /// Lifecycle state changed
    StateChanged(RecorderState),

    /// Cumulative recorded time changed, in seconds
    TimeChanged(f64),

    /// A complete WAV buffer produced in response to an audio request
    AudioReady(Vec<u8>),
}

/// Identifies one subscription for later removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
struct BusInner {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Sender<RecorderEvent>)>,
}

/// Fan-out registry for recorder events.
///
/// Subscriber channels are unbounded so dispatch never blocks the capture
/// callback; a subscriber whose receiver was dropped is pruned on the next
/// emit.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber and return its id plus event receiver.
    pub fn subscribe(&self) -> (SubscriptionId, Receiver<RecorderEvent>) {
        let (tx, rx) = unbounded();

        let mut inner = self.inner.lock();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push((id, tx));

        (id, rx)
    }

    /// Remove a subscriber; returns whether it was registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.lock();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|(sub_id, _)| *sub_id != id);
        inner.subscribers.len() < before
    }

    /// Deliver an event to every live subscriber.
    pub fn emit(&self, event: RecorderEvent) {
        let mut inner = self.inner.lock();
        inner
            .subscribers
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.lock().subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_receives_events() {
        let bus = EventBus::new();
        let (_id, rx) = bus.subscribe();

        bus.emit(RecorderEvent::TimeChanged(1.5));

        assert_eq!(rx.recv().unwrap(), RecorderEvent::TimeChanged(1.5));
    }

    #[test]
    fn test_all_subscribers_receive_each_event() {
        let bus = EventBus::new();
        let (_a, rx_a) = bus.subscribe();
        let (_b, rx_b) = bus.subscribe();

        bus.emit(RecorderEvent::StateChanged(RecorderState::Recording));

        assert_eq!(
            rx_a.recv().unwrap(),
            RecorderEvent::StateChanged(RecorderState::Recording)
        );
        assert_eq!(
            rx_b.recv().unwrap(),
            RecorderEvent::StateChanged(RecorderState::Recording)
        );
    }

    #[test]
    fn test_unsubscribed_receiver_gets_nothing_further() {
        let bus = EventBus::new();
        let (id, rx) = bus.subscribe();

        bus.emit(RecorderEvent::TimeChanged(1.0));
        assert!(bus.unsubscribe(id));
        bus.emit(RecorderEvent::TimeChanged(2.0));

        assert_eq!(rx.recv().unwrap(), RecorderEvent::TimeChanged(1.0));
        assert!(rx.try_recv().is_err());
        assert!(!bus.unsubscribe(id));
    }

    #[test]
    fn test_dropped_receiver_is_pruned() {
        let bus = EventBus::new();
        let (_id, rx) = bus.subscribe();
        drop(rx);

        bus.emit(RecorderEvent::TimeChanged(0.5));

        assert_eq!(bus.subscriber_count(), 0);
    }
}
