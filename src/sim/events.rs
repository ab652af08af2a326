//! Event hub for game-lifecycle signals
//!
//! One hub per session, owned by the game state and handed by reference to
//! whoever needs to publish or subscribe. Delivery is synchronous: every
//! handler registered when `publish` is called runs before it returns.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// A signal published through the hub
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Signal {
    /// Lives exhausted, the run is over
    GameEnded,
    /// Player bounced off a platform
    PlayerJumped,
    /// Player gained a side
    PlayerLeveledUp { level: u32 },
    /// Player lost a life but can resume
    PlayerDied { lives_left: u32 },
    /// Controls will swap after `delay` seconds
    SwapTriggered { delay: f32 },
    /// Controls swapped
    Swapped,
}

/// Signal discriminant used for subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    GameEnded,
    PlayerJumped,
    PlayerLeveledUp,
    PlayerDied,
    SwapTriggered,
    Swapped,
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::GameEnded => SignalKind::GameEnded,
            Signal::PlayerJumped => SignalKind::PlayerJumped,
            Signal::PlayerLeveledUp { .. } => SignalKind::PlayerLeveledUp,
            Signal::PlayerDied { .. } => SignalKind::PlayerDied,
            Signal::SwapTriggered { .. } => SignalKind::SwapTriggered,
            Signal::Swapped => SignalKind::Swapped,
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u32);

type Handler = Rc<dyn Fn(&Signal)>;

struct Subscriber {
    id: SubscriptionId,
    kind: SignalKind,
    handler: Handler,
}

/// Publish/subscribe registry
#[derive(Default)]
pub struct EventHub {
    subscribers: RefCell<Vec<Subscriber>>,
    next_id: Cell<u32>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub")
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for every future signal of `kind`
    pub fn subscribe(&self, kind: SignalKind, handler: impl Fn(&Signal) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            kind,
            handler: Rc::new(handler),
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.borrow_mut();
        let before = subscribers.len();
        subscribers.retain(|s| s.id != id);
        subscribers.len() != before
    }

    /// Deliver `signal` to everyone subscribed to its kind right now
    pub fn publish(&self, signal: Signal) {
        // Snapshot first: handlers may subscribe/unsubscribe while we dispatch
        let snapshot: Vec<Handler> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|s| s.kind == signal.kind())
            .map(|s| Rc::clone(&s.handler))
            .collect();

        log::trace!("publish {:?} to {} subscribers", signal, snapshot.len());
        for handler in snapshot {
            handler(&signal);
        }
    }

    pub fn subscriber_count(&self, kind: SignalKind) -> usize {
        self.subscribers
            .borrow()
            .iter()
            .filter(|s| s.kind == kind)
            .count()
    }
}

/// Buffered subscription drained by its owner on its next update
///
/// Components that own mutable state (platform streamer, player, HUD) can't
/// be borrowed from inside a hub handler, so they collect signals here and
/// react at a well-defined point in their own update.
#[derive(Debug, Default)]
pub struct Mailbox {
    inbox: Rc<RefCell<VecDeque<Signal>>>,
    subscriptions: Vec<SubscriptionId>,
}

impl Mailbox {
    pub fn subscribe(hub: &EventHub, kinds: &[SignalKind]) -> Self {
        let inbox = Rc::new(RefCell::new(VecDeque::new()));
        let subscriptions = kinds
            .iter()
            .map(|&kind| {
                let inbox = Rc::clone(&inbox);
                hub.subscribe(kind, move |signal| inbox.borrow_mut().push_back(*signal))
            })
            .collect();
        Self {
            inbox,
            subscriptions,
        }
    }

    /// Take all buffered signals in publish order
    pub fn drain(&self) -> Vec<Signal> {
        self.inbox.borrow_mut().drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inbox.borrow().is_empty()
    }

    /// Stop receiving signals
    pub fn detach(&mut self, hub: &EventHub) {
        for id in self.subscriptions.drain(..) {
            hub.unsubscribe(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_to_matching_kind() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        for _ in 0..3 {
            let hits = Rc::clone(&hits);
            hub.subscribe(SignalKind::PlayerJumped, move |_| hits.set(hits.get() + 1));
        }
        let other = Rc::new(Cell::new(0));
        {
            let other = Rc::clone(&other);
            hub.subscribe(SignalKind::GameEnded, move |_| other.set(other.get() + 1));
        }

        hub.publish(Signal::PlayerJumped);
        assert_eq!(hits.get(), 3);
        assert_eq!(other.get(), 0);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let hub = EventHub::new();
        hub.publish(Signal::Swapped);
        assert_eq!(hub.subscriber_count(SignalKind::Swapped), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let hub = EventHub::new();
        let hits = Rc::new(Cell::new(0));
        let id = {
            let hits = Rc::clone(&hits);
            hub.subscribe(SignalKind::Swapped, move |_| hits.set(hits.get() + 1))
        };
        hub.publish(Signal::Swapped);
        assert!(hub.unsubscribe(id));
        assert!(!hub.unsubscribe(id));
        hub.publish(Signal::Swapped);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_subscribe_during_dispatch_uses_snapshot() {
        let hub = Rc::new(EventHub::new());
        let late_hits = Rc::new(Cell::new(0));
        {
            let hub_ref = Rc::downgrade(&hub);
            let late_hits = Rc::clone(&late_hits);
            hub.subscribe(SignalKind::PlayerJumped, move |_| {
                if let Some(hub) = hub_ref.upgrade() {
                    let late_hits = Rc::clone(&late_hits);
                    hub.subscribe(SignalKind::PlayerJumped, move |_| {
                        late_hits.set(late_hits.get() + 1)
                    });
                }
            });
        }

        hub.publish(Signal::PlayerJumped);
        assert_eq!(late_hits.get(), 0, "new subscriber must not see the current publish");

        hub.publish(Signal::PlayerJumped);
        assert_eq!(late_hits.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_dispatch_keeps_snapshot() {
        let hub = Rc::new(EventHub::new());
        let second_hits = Rc::new(Cell::new(0));
        let second_id = Rc::new(Cell::new(None));
        {
            let hub_ref = Rc::downgrade(&hub);
            let second_id = Rc::clone(&second_id);
            hub.subscribe(SignalKind::GameEnded, move |_| {
                if let (Some(hub), Some(id)) = (hub_ref.upgrade(), second_id.get()) {
                    hub.unsubscribe(id);
                }
            });
        }
        {
            let second_hits = Rc::clone(&second_hits);
            let id = hub.subscribe(SignalKind::GameEnded, move |_| {
                second_hits.set(second_hits.get() + 1)
            });
            second_id.set(Some(id));
        }

        hub.publish(Signal::GameEnded);
        assert_eq!(second_hits.get(), 1);
        hub.publish(Signal::GameEnded);
        assert_eq!(second_hits.get(), 1);
    }

    #[test]
    fn test_mailbox_buffers_in_order() {
        let hub = EventHub::new();
        let mut mailbox = Mailbox::subscribe(&hub, &[SignalKind::PlayerDied, SignalKind::GameEnded]);

        hub.publish(Signal::PlayerDied { lives_left: 2 });
        hub.publish(Signal::PlayerJumped);
        hub.publish(Signal::GameEnded);

        assert_eq!(
            mailbox.drain(),
            vec![Signal::PlayerDied { lives_left: 2 }, Signal::GameEnded]
        );
        assert!(mailbox.is_empty());

        mailbox.detach(&hub);
        hub.publish(Signal::GameEnded);
        assert!(mailbox.is_empty());
        assert_eq!(hub.subscriber_count(SignalKind::GameEnded), 0);
    }
}
