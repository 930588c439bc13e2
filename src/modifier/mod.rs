//! Stat modifier pipeline
//!
//! Modifiers rescale entity stats from the creation-time baseline: once at
//! creation (`apply`) and every tick (`update`), re-reading an external
//! source each time. They are registered on the simulation and run in
//! registration order.

pub mod aggression;
pub mod progression;

pub use aggression::AggressionModifier;
pub use progression::ProgressionModifier;

use std::cell::Cell;
use std::rc::Rc;

use crate::entity::Entity;

/// A stat scaler driven by an external source
pub trait Modifier {
    /// One-time baseline scaling, run at entity creation
    fn apply(&mut self, entity: &mut Entity);

    /// Per-tick re-scaling; implementations only rewrite stats when their
    /// source actually changed
    fn update(&mut self, entity: &mut Entity, dt: f32);
}

/// Read-only accessor for the host's progression level
pub trait ProgressionSource {
    fn level(&self) -> u32;
}

/// Read-only accessor for the host's aggression/difficulty scalar
pub trait AggressionSource {
    fn aggression(&self) -> f32;
}

/// Constant level, handy for tests and fixed-difficulty runs
#[derive(Debug, Clone, Copy)]
pub struct FixedLevel(pub u32);

impl ProgressionSource for FixedLevel {
    fn level(&self) -> u32 {
        self.0
    }
}

/// Level cell shared with the host; the simulation stays single-threaded so
/// a plain `Rc<Cell<_>>` suffices
#[derive(Debug, Clone)]
pub struct SharedLevel(Rc<Cell<u32>>);

impl SharedLevel {
    pub fn new(initial: u32) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    /// Handle the host keeps to move the level
    pub fn handle(&self) -> Rc<Cell<u32>> {
        Rc::clone(&self.0)
    }
}

impl ProgressionSource for SharedLevel {
    fn level(&self) -> u32 {
        self.0.get()
    }
}

/// Constant aggression scalar
#[derive(Debug, Clone, Copy)]
pub struct FixedAggression(pub f32);

impl AggressionSource for FixedAggression {
    fn aggression(&self) -> f32 {
        self.0
    }
}

/// Aggression cell shared with the host
#[derive(Debug, Clone)]
pub struct SharedAggression(Rc<Cell<f32>>);

impl SharedAggression {
    pub fn new(initial: f32) -> Self {
        Self(Rc::new(Cell::new(initial)))
    }

    pub fn handle(&self) -> Rc<Cell<f32>> {
        Rc::clone(&self.0)
    }
}

impl AggressionSource for SharedAggression {
    fn aggression(&self) -> f32 {
        self.0.get()
    }
}
