use core::fmt;
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::{ActionStrategy, ConfigError, Fact, FactSet, Result, TickContext};

/// Index of an action inside the planner's action list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub usize);

/// A costed operation with preconditions, guaranteed effects and an execution strategy.
///
/// Structure is fixed once built; only the strategy carries runtime state.
pub struct AgentAction<W> {
    name: Rc<str>,
    cost: f32,
    preconditions: FactSet<W>,
    effects: FactSet<W>,
    strategy: Box<dyn ActionStrategy<W>>,
}

impl<W> AgentAction<W> {
    pub fn builder(name: impl AsRef<str>) -> ActionBuilder<W> {
        ActionBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cost(&self) -> f32 {
        self.cost
    }

    pub fn preconditions(&self) -> &FactSet<W> {
        &self.preconditions
    }

    pub fn effects(&self) -> &FactSet<W> {
        &self.effects
    }

    pub fn preconditions_met(&self, world: &W) -> bool {
        self.preconditions.iter().all(|fact| fact.evaluate(world))
    }

    /// Effects that still evaluate false.
    pub fn unmet_effects<'a>(&'a self, world: &'a W) -> impl Iterator<Item = &'a Fact<W>> + 'a {
        self.effects.iter().filter(move |fact| !fact.evaluate(world))
    }

    pub fn can_perform(&self, world: &W) -> bool {
        self.strategy.can_perform(world)
    }

    pub fn is_complete(&self, world: &W) -> bool {
        self.strategy.is_complete(world)
    }

    pub fn start(&mut self, ctx: &TickContext, world: &mut W) {
        self.strategy.start(ctx, world);
    }

    /// Advance the strategy by one tick, if it can currently perform.
    pub fn update(&mut self, ctx: &TickContext, world: &mut W) {
        if self.strategy.can_perform(world) {
            self.strategy.update(ctx, world);
        }
    }

    pub fn stop(&mut self, ctx: &TickContext, world: &mut W) {
        self.strategy.stop(ctx, world);
    }
}

impl<W> fmt::Debug for AgentAction<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentAction")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("preconditions", &self.preconditions)
            .field("effects", &self.effects)
            .finish_non_exhaustive()
    }
}

pub struct ActionBuilder<W> {
    name: Rc<str>,
    cost: f32,
    preconditions: FactSet<W>,
    effects: FactSet<W>,
    strategy: Option<Box<dyn ActionStrategy<W>>>,
}

impl<W> ActionBuilder<W> {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self {
            name: Rc::from(name.as_ref()),
            cost: 1.0,
            preconditions: BTreeSet::new(),
            effects: BTreeSet::new(),
            strategy: None,
        }
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = cost;
        self
    }

    pub fn with_strategy(mut self, strategy: impl ActionStrategy<W> + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    pub fn add_precondition(mut self, fact: Fact<W>) -> Self {
        self.preconditions.insert(fact);
        self
    }

    pub fn add_effect(mut self, fact: Fact<W>) -> Self {
        self.effects.insert(fact);
        self
    }

    pub fn build(self) -> Result<AgentAction<W>> {
        let action = self.name.to_string();
        let Some(strategy) = self.strategy else {
            return Err(ConfigError::MissingStrategy { action });
        };
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(ConfigError::InvalidCost {
                action,
                cost: self.cost,
            });
        }
        if self.effects.is_empty() {
            return Err(ConfigError::NoEffects { action });
        }
        if let Some(fact) = self.preconditions.intersection(&self.effects).next() {
            return Err(ConfigError::CircularAction {
                action,
                fact: fact.name().to_string(),
            });
        }

        Ok(AgentAction {
            name: self.name,
            cost: self.cost,
            preconditions: self.preconditions,
            effects: self.effects,
            strategy,
        })
    }
}
