//! Simulation loop - per-tick orchestration of modifiers, selection, and
//! behavior execution

pub mod select;

pub use select::select_behavior;

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::behavior::catalog::{default_catalog, BehaviorKind, BehaviorSpec, FLEE_HEALTH_RATIO};
use crate::behavior::conditions::SelectionCtx;
use crate::behavior::{self, BehaviorCtx, BehaviorState, EntitySnapshot};
use crate::core::config::EngineConfig;
use crate::core::error::{PackError, Result};
use crate::core::types::{EntityId, Tick, Vec3};
use crate::entity::{Entity, EntityOverrides, EntityPatch, Registry};
use crate::events::{EngineEvent, EventBus, InboundEvent};
use crate::modifier::Modifier;
use crate::path::Pathfinder;

/// The behavior engine: owns entities, behaviors, modifiers, and the event
/// mediator, and advances them one host frame at a time
///
/// Single-threaded and cooperative: the host calls `step` once per frame
/// with the wall-clock delta; within a tick the loop is the sole mutator of
/// entity records and at most one behavior executes per entity.
pub struct Simulation {
    config: EngineConfig,
    registry: Registry,
    bus: EventBus,
    catalog: Vec<BehaviorSpec>,
    modifiers: Vec<Box<dyn Modifier>>,
    pathfinder: Box<dyn Pathfinder>,
    states: AHashMap<(EntityId, BehaviorKind), BehaviorState>,
    inbound: VecDeque<InboundEvent>,
    /// Entities whose next selection is forced to Combat by a detection
    /// event, bypassing the priority scan for that tick
    forced_combat: AHashSet<EntityId>,
    rng: ChaCha8Rng,
    now_ms: f64,
    current_tick: Tick,
}

impl Simulation {
    pub fn new(config: EngineConfig, pathfinder: Box<dyn Pathfinder>, seed: u64) -> Result<Self> {
        config.validate().map_err(PackError::ConfigError)?;
        let history_cap = config.event_history_cap;
        let catalog = default_catalog(&config);

        Ok(Self {
            config,
            registry: Registry::new(),
            bus: EventBus::new(history_cap),
            catalog,
            modifiers: Vec::new(),
            pathfinder,
            states: AHashMap::new(),
            inbound: VecDeque::new(),
            forced_combat: AHashSet::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            now_ms: 0.0,
            current_tick: 0,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn current_tick(&self) -> Tick {
        self.current_tick
    }

    /// The event mediator, for subscribe/unsubscribe and history access
    pub fn bus(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    /// Behavior catalog, priorities and conditions included; mutable so
    /// hosts can retune priorities
    pub fn catalog_mut(&mut self) -> &mut Vec<BehaviorSpec> {
        &mut self.catalog
    }

    /// Register a modifier; registration order is application order
    pub fn add_modifier(&mut self, modifier: Box<dyn Modifier>) {
        self.modifiers.push(modifier);
    }

    /// Build an entity from overrides, run every registered modifier over
    /// it once, insert it, and announce it
    pub fn add_entity(&mut self, overrides: EntityOverrides) -> EntityId {
        let mut entity = Entity::with_overrides(overrides);
        for modifier in &mut self.modifiers {
            modifier.apply(&mut entity);
        }
        let id = self.registry.insert(entity);
        self.bus.publish(EngineEvent::EntityAdded { id });
        id
    }

    /// Remove an entity and announce the removal; in-flight paths need no
    /// cascading cleanup
    pub fn remove_entity(&mut self, id: EntityId) {
        if self.registry.remove(id).is_none() {
            tracing::warn!("remove_entity: entity {id:?} not found");
            return;
        }
        self.states.retain(|(entity_id, _), _| *entity_id != id);
        self.forced_combat.remove(&id);
        self.bus.publish(EngineEvent::EntityRemoved { id });
    }

    /// Shallow-merge a patch onto an entity
    pub fn update_entity(&mut self, id: EntityId, patch: EntityPatch) -> Result<()> {
        let entity = self
            .registry
            .get_mut(id)
            .ok_or(PackError::EntityNotFound(id))?;
        entity.apply_patch(patch);
        Ok(())
    }

    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.registry.get(id)
    }

    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.registry.iter()
    }

    /// Append a behavior kind to the entity's list if not already present
    pub fn assign_behavior(&mut self, id: EntityId, kind: BehaviorKind) -> Result<()> {
        let entity = self
            .registry
            .get_mut(id)
            .ok_or(PackError::EntityNotFound(id))?;
        if !entity.behaviors.contains(&kind) {
            entity.behaviors.push(kind);
        }
        Ok(())
    }

    /// Filter a behavior kind out of the entity's list
    pub fn remove_behavior(&mut self, id: EntityId, kind: BehaviorKind) -> Result<()> {
        let entity = self
            .registry
            .get_mut(id)
            .ok_or(PackError::EntityNotFound(id))?;
        entity.behaviors.retain(|assigned| *assigned != kind);
        Ok(())
    }

    /// Hand an entity its patrol loop; index resets to the first waypoint
    pub fn set_patrol_route(&mut self, id: EntityId, route: Vec<Vec3>) -> Result<()> {
        if !self.registry.contains(id) {
            return Err(PackError::EntityNotFound(id));
        }
        self.states.insert(
            (id, BehaviorKind::Patrol),
            BehaviorState::Patrol(crate::behavior::patrol::PatrolState::with_route(route)),
        );
        Ok(())
    }

    /// Queue an inbound event; drained at the top of the next `step`
    pub fn post(&mut self, event: InboundEvent) {
        self.inbound.push_back(event);
    }

    /// Advance the simulation by one host frame
    ///
    /// `dt_ms` is the wall-clock delta since the previous frame.
    pub fn step(&mut self, dt_ms: f64) {
        self.now_ms += dt_ms;
        self.current_tick += 1;
        let dt = (dt_ms / 1000.0) as f32;

        self.drain_inbound();

        // Positions and headings resolve against a start-of-tick snapshot,
        // so mid-tick mutation cannot race neighbor or target lookups
        let snapshot: Vec<EntitySnapshot> =
            self.registry.iter().map(EntitySnapshot::of).collect();

        for id in self.registry.ids() {
            // Tolerate entities removed earlier in this same tick
            if !self.registry.contains(id) {
                continue;
            }

            // 1. Modifier updates
            for modifier in &mut self.modifiers {
                if let Some(entity) = self.registry.get_mut(id) {
                    modifier.update(entity, dt);
                }
            }

            let Some(entity) = self.registry.get_mut(id) else {
                tracing::warn!("step: entity {id:?} vanished mid-tick");
                continue;
            };

            // 2. Selection facts
            let target_distance = entity.target.and_then(|target_id| {
                snapshot
                    .iter()
                    .find(|snap| snap.id == target_id)
                    .map(|snap| entity.position.distance(&snap.position))
            });
            let selection_ctx = SelectionCtx { target_distance };

            // An in-flight escape holds the pick until the behavior itself
            // reports completion; eligibility (threat within 15) only
            // governs activation, while safety sits at 30 units out
            let fleeing = matches!(
                self.states.get(&(id, BehaviorKind::Flee)),
                Some(BehaviorState::Flee(state)) if state.start_position.is_some()
            );

            // 3. Pick: detection forces Combat past the scan for one tick
            let picked = if self.forced_combat.remove(&id) {
                BehaviorKind::Combat
            } else if fleeing {
                BehaviorKind::Flee
            } else {
                select_behavior(entity, &self.catalog, &selection_ctx)
            };

            // 4. Announce the switch before the field changes
            if picked != entity.current_behavior {
                self.bus.publish(EngineEvent::BehaviorChanged {
                    id,
                    from: entity.current_behavior,
                    to: picked,
                });
                entity.current_behavior = picked;
            }

            // 5. Execute, then integrate movement
            let state = self
                .states
                .entry((id, picked))
                .or_insert_with(|| BehaviorState::for_kind(picked));
            let mut ctx = BehaviorCtx {
                now_ms: self.now_ms,
                config: &self.config,
                snapshot: &snapshot,
                pathfinder: &*self.pathfinder,
                rng: &mut self.rng,
                bus: &mut self.bus,
            };
            behavior::execute(entity, state, &mut ctx);
            behavior::update(entity, state, dt, &self.config);
        }
    }

    fn drain_inbound(&mut self) {
        while let Some(event) = self.inbound.pop_front() {
            match event {
                InboundEvent::EntityDamaged { entity: id, damage } => {
                    let Some(entity) = self.registry.get_mut(id) else {
                        tracing::warn!("EntityDamaged: entity {id:?} not found");
                        continue;
                    };
                    entity.health = (entity.health - damage).clamp(0.0, entity.max_health);
                    tracing::debug!(
                        "entity {id:?} damaged by {damage}, health now {}",
                        entity.health
                    );
                    if entity.health_ratio() < FLEE_HEALTH_RATIO
                        && !entity.behaviors.contains(&BehaviorKind::Flee)
                    {
                        entity.behaviors.push(BehaviorKind::Flee);
                    }
                }
                InboundEvent::PlayerDetected { entity: id, player } => {
                    let Some(entity) = self.registry.get_mut(id) else {
                        tracing::warn!("PlayerDetected: entity {id:?} not found");
                        continue;
                    };
                    entity.target = Some(player);
                    // Field is set directly; the scan bypass fires on the
                    // next step
                    entity.current_behavior = BehaviorKind::Combat;
                    self.forced_combat.insert(id);
                }
            }
        }
    }
}
