//! Backward-chaining GOAP planner and the tick-driven agent that executes its plans.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod plan;
pub mod planner;

pub use agent::{AgentPhase, GoapAgent, GoapAgentConfig};
pub use plan::ActionPlan;
pub use planner::{GoapPlanner, PlannerConfig};
