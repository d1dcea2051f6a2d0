//! Facts, actions, goals and execution strategies for goal-oriented action planning.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod error;
pub mod fact;
pub mod goal;
pub mod nav;
pub mod rng;
pub mod strategy;
pub mod tick;
pub mod timer;

pub use action::{ActionBuilder, ActionId, AgentAction};
pub use error::{ConfigError, Result};
pub use fact::{Fact, FactRegistry, FactSet};
pub use goal::{AgentGoal, GoalBuilder};
pub use nav::{MoveStrategy, Navigator, Position, WanderStrategy};
pub use rng::{DeterministicRng, SplitMix64};
pub use strategy::{ActionStrategy, FnStrategy, IdleStrategy};
pub use tick::TickContext;
pub use timer::CountdownTimer;
