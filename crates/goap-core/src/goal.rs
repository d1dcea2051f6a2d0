use core::fmt;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::{ConfigError, Fact, FactSet, Result};

/// A prioritized set of facts the agent wants to become true.
pub struct AgentGoal<W> {
    name: Rc<str>,
    priority: f32,
    desired_effects: FactSet<W>,
}

impl<W> AgentGoal<W> {
    pub fn builder(name: impl AsRef<str>) -> GoalBuilder<W> {
        GoalBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn priority(&self) -> f32 {
        self.priority
    }

    pub fn desired_effects(&self) -> &FactSet<W> {
        &self.desired_effects
    }

    /// True when every desired effect already holds; such a goal needs no plan.
    pub fn is_satisfied(&self, world: &W) -> bool {
        self.desired_effects.iter().all(|fact| fact.evaluate(world))
    }

    /// Goals are identified by name.
    pub fn same_goal(&self, other: &AgentGoal<W>) -> bool {
        self.name == other.name
    }
}

impl<W> Clone for AgentGoal<W> {
    fn clone(&self) -> Self {
        Self {
            name: Rc::clone(&self.name),
            priority: self.priority,
            desired_effects: self.desired_effects.clone(),
        }
    }
}

impl<W> fmt::Debug for AgentGoal<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentGoal")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("desired_effects", &self.desired_effects)
            .finish()
    }
}

pub struct GoalBuilder<W> {
    name: Rc<str>,
    priority: f32,
    desired_effects: FactSet<W>,
}

impl<W> GoalBuilder<W> {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            priority: 0.0,
            desired_effects: BTreeSet::new(),
        }
    }

    pub fn with_priority(mut self, priority: f32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_desired_effect(mut self, fact: Fact<W>) -> Self {
        self.desired_effects.insert(fact);
        self
    }

    pub fn build(self) -> Result<AgentGoal<W>> {
        if self.desired_effects.is_empty() {
            return Err(ConfigError::EmptyGoal {
                goal: self.name.to_string(),
            });
        }
        if !self.priority.is_finite() {
            return Err(ConfigError::InvalidPriority {
                goal: self.name.to_string(),
                priority: self.priority,
            });
        }

        Ok(AgentGoal {
            name: self.name,
            priority: self.priority,
            desired_effects: self.desired_effects,
        })
    }
}
