//! Engine events and the host-facing event mediator
//!
//! The bus is an explicit mediator injected into the simulation rather than
//! ambient shared state: hosts subscribe per topic, the loop publishes, and
//! a bounded history keeps recent events inspectable without a subscription.

use ahash::AHashMap;
use serde::Serialize;

use crate::behavior::catalog::BehaviorKind;
use crate::core::types::{EntityId, Vec3};

/// Event produced by the engine for host consumption
#[derive(Clone, Debug, Serialize)]
pub enum EngineEvent {
    EntityAdded { id: EntityId },
    EntityRemoved { id: EntityId },
    BehaviorChanged { id: EntityId, from: BehaviorKind, to: BehaviorKind },
    Attack { attacker: EntityId, target: EntityId, position: Vec3, direction: Vec3 },
    FleeStart { id: EntityId, position: Vec3 },
    FleeComplete { id: EntityId },
}

impl EngineEvent {
    pub fn topic(&self) -> EventTopic {
        match self {
            EngineEvent::EntityAdded { .. } => EventTopic::EntityAdded,
            EngineEvent::EntityRemoved { .. } => EventTopic::EntityRemoved,
            EngineEvent::BehaviorChanged { .. } => EventTopic::BehaviorChanged,
            EngineEvent::Attack { .. } => EventTopic::Attack,
            EngineEvent::FleeStart { .. } => EventTopic::FleeStart,
            EngineEvent::FleeComplete { .. } => EventTopic::FleeComplete,
        }
    }
}

/// Subscription topic, one per `EngineEvent` variant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum EventTopic {
    EntityAdded,
    EntityRemoved,
    BehaviorChanged,
    Attack,
    FleeStart,
    FleeComplete,
}

/// Event consumed by the engine, posted by the host
#[derive(Clone, Debug, Serialize)]
pub enum InboundEvent {
    /// Reduces health; a resulting ratio below the flee threshold
    /// force-assigns the Flee behavior
    EntityDamaged { entity: EntityId, damage: f32 },
    /// Sets the target and forces Combat for the next tick, bypassing the
    /// normal priority scan
    PlayerDetected { entity: EntityId, player: EntityId },
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type Handler = Box<dyn FnMut(&EngineEvent)>;

/// Per-topic subscriber registry with a bounded published-event history
pub struct EventBus {
    subscribers: AHashMap<EventTopic, Vec<(SubscriberId, Handler)>>,
    history: Vec<EngineEvent>,
    history_cap: usize,
    next_subscriber: u64,
}

impl EventBus {
    pub fn new(history_cap: usize) -> Self {
        Self {
            subscribers: AHashMap::new(),
            history: Vec::new(),
            history_cap,
            next_subscriber: 0,
        }
    }

    pub fn subscribe(
        &mut self,
        topic: EventTopic,
        handler: impl FnMut(&EngineEvent) + 'static,
    ) -> SubscriberId {
        let id = SubscriberId(self.next_subscriber);
        self.next_subscriber += 1;
        self.subscribers
            .entry(topic)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription; unknown ids are ignored
    pub fn unsubscribe(&mut self, id: SubscriberId) {
        for handlers in self.subscribers.values_mut() {
            handlers.retain(|(handler_id, _)| *handler_id != id);
        }
    }

    pub fn publish(&mut self, event: EngineEvent) {
        if let Some(handlers) = self.subscribers.get_mut(&event.topic()) {
            for (_, handler) in handlers.iter_mut() {
                handler(&event);
            }
        }

        // A zero cap disables retention entirely
        if self.history_cap > 0 {
            if self.history.len() == self.history_cap {
                self.history.remove(0);
            }
            self.history.push(event);
        }
    }

    /// Recently published events, oldest first
    pub fn history(&self) -> &[EngineEvent] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
