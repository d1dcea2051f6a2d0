use core::fmt;

use goap_core::{ActionId, AgentGoal};

/// The chosen goal plus the actions that achieve it.
///
/// Actions are held as a stack: [`ActionPlan::pop`] returns the next action to execute.
pub struct ActionPlan<W> {
    goal: AgentGoal<W>,
    actions: Vec<ActionId>,
    total_cost: f32,
}

impl<W> ActionPlan<W> {
    /// `actions` is in push order: the goal-achieving action first, the first action to run last.
    pub fn new(goal: AgentGoal<W>, actions: Vec<ActionId>, total_cost: f32) -> Self {
        Self {
            goal,
            actions,
            total_cost,
        }
    }

    pub fn goal(&self) -> &AgentGoal<W> {
        &self.goal
    }

    pub fn total_cost(&self) -> f32 {
        self.total_cost
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn peek(&self) -> Option<ActionId> {
        self.actions.last().copied()
    }

    pub fn pop(&mut self) -> Option<ActionId> {
        self.actions.pop()
    }

    /// Remaining actions, next-to-execute first.
    pub fn execution_order(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.actions.iter().rev().copied()
    }
}

impl<W> Clone for ActionPlan<W> {
    fn clone(&self) -> Self {
        Self {
            goal: self.goal.clone(),
            actions: self.actions.clone(),
            total_cost: self.total_cost,
        }
    }
}

impl<W> fmt::Debug for ActionPlan<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionPlan")
            .field("goal", &self.goal.name())
            .field("actions", &self.actions)
            .field("total_cost", &self.total_cost)
            .finish()
    }
}
