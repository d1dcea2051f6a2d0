use std::collections::{BTreeSet, HashSet};

use goap_core::{ActionId, AgentAction, AgentGoal, ConfigError, FactSet, Result};
#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::ActionPlan;

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct PlannerConfig {
    /// Priority penalty applied, for ordering only, to the most recently completed goal.
    pub goal_hysteresis: f32,

    /// Upper bound on search nodes created per goal. Branches past the budget count as failed.
    pub max_expansions: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            goal_hysteresis: 0.01,
            max_expansions: 4096,
        }
    }
}

/// Search tree node. Each node owns its required set; siblings never share one.
struct Node<W> {
    action: Option<ActionId>,
    required: FactSet<W>,
    leaves: Vec<Node<W>>,
    cost: f32,
}

impl<W> Node<W> {
    fn root(required: FactSet<W>) -> Self {
        Self {
            action: None,
            required,
            leaves: Vec::new(),
            cost: 0.0,
        }
    }

    fn step(action: ActionId, required: FactSet<W>, cost: f32) -> Self {
        Self {
            action: Some(action),
            required,
            leaves: Vec::new(),
            cost,
        }
    }
}

/// Backward-chaining planner over a fixed action set.
///
/// For a goal it walks from the desired facts back through action effects, turning each chosen
/// action's preconditions into newly required facts, until everything still required already
/// holds in the world. Cheaper actions are tried first and the plan follows the cheapest child at
/// every level, so the result is locally cheap rather than globally optimal.
pub struct GoapPlanner<W> {
    actions: Vec<AgentAction<W>>,
    config: PlannerConfig,
}

impl<W> GoapPlanner<W> {
    pub fn new(actions: Vec<AgentAction<W>>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for action in &actions {
            if !names.insert(action.name()) {
                return Err(ConfigError::DuplicateAction(action.name().to_string()));
            }
        }

        Ok(Self {
            actions,
            config: PlannerConfig::default(),
        })
    }

    pub fn with_config(mut self, config: PlannerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn actions(&self) -> &[AgentAction<W>] {
        &self.actions
    }

    pub fn action(&self, id: ActionId) -> Option<&AgentAction<W>> {
        self.actions.get(id.0)
    }

    pub fn action_mut(&mut self, id: ActionId) -> Option<&mut AgentAction<W>> {
        self.actions.get_mut(id.0)
    }

    pub fn find_action(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.name() == name)
            .map(ActionId)
    }

    /// Goals that still need work, highest effective priority first.
    ///
    /// `most_recent` loses `goal_hysteresis` priority so that a goal that was just completed does
    /// not win a tie again. Equal effective priorities keep their input order.
    pub fn order_goals<'g>(
        &self,
        goals: impl IntoIterator<Item = &'g AgentGoal<W>>,
        most_recent: Option<&AgentGoal<W>>,
        world: &W,
    ) -> Vec<&'g AgentGoal<W>>
    where
        W: 'g,
    {
        let effective = |goal: &AgentGoal<W>| match most_recent {
            Some(recent) if recent.same_goal(goal) => goal.priority() - self.config.goal_hysteresis,
            _ => goal.priority(),
        };

        let mut ordered: Vec<&AgentGoal<W>> = goals
            .into_iter()
            .filter(|goal| !goal.is_satisfied(world))
            .collect();
        ordered.sort_by(|a, b| effective(*b).total_cmp(&effective(*a)));
        ordered
    }

    /// Plan for the best achievable goal, or `None` when nothing is achievable.
    pub fn plan<'g>(
        &self,
        goals: impl IntoIterator<Item = &'g AgentGoal<W>>,
        most_recent: Option<&AgentGoal<W>>,
        world: &W,
    ) -> Option<ActionPlan<W>>
    where
        W: 'g,
    {
        let ordered = self.order_goals(goals, most_recent, world);
        tracing::debug!(
            goals = ?ordered.iter().map(|g| g.name()).collect::<Vec<_>>(),
            "goal order"
        );

        for goal in ordered {
            if let Some(plan) = self.plan_for_goal(goal, world) {
                tracing::debug!(
                    goal = goal.name(),
                    steps = plan.len(),
                    cost = plan.total_cost(),
                    "plan found"
                );
                return Some(plan);
            }
            tracing::debug!(goal = goal.name(), "no plan for goal");
        }

        tracing::debug!("no plan found");
        None
    }

    /// Search a single goal, ignoring priority.
    pub fn plan_for_goal(&self, goal: &AgentGoal<W>, world: &W) -> Option<ActionPlan<W>> {
        let mut pool: Vec<ActionId> = (0..self.actions.len()).map(ActionId).collect();
        pool.sort_by(|a, b| self.actions[a.0].cost().total_cmp(&self.actions[b.0].cost()));

        let mut root = Node::root(goal.desired_effects().clone());
        let mut search = Search {
            planner: self,
            world,
            failed: HashSet::new(),
            budget: self.config.max_expansions,
            truncations: 0,
        };
        if !search.expand(&mut root, &pool) || root.leaves.is_empty() {
            return None;
        }
        if search.truncations > 0 {
            tracing::debug!(
                goal = goal.name(),
                truncations = search.truncations,
                "plan found with truncated branches"
            );
        }

        // Ties keep the first child attached, i.e. the cheaper/earlier declared action.
        let mut steps = Vec::new();
        let mut node = &root;
        while let Some(cheapest) = node.leaves.iter().min_by(|a, b| a.cost.total_cmp(&b.cost)) {
            steps.extend(cheapest.action);
            node = cheapest;
        }

        Some(ActionPlan::new(goal.clone(), steps, node.cost))
    }
}

/// State of one goal's search.
///
/// Every branch leaving the root gets a fresh `max_expansions` budget, so an expensive dead
/// branch cannot starve its siblings. Subtrees that fail without hitting the budget are
/// remembered by `(required, pool)` and never expanded twice.
struct Search<'p, W> {
    planner: &'p GoapPlanner<W>,
    world: &'p W,
    failed: HashSet<(FactSet<W>, Vec<ActionId>)>,
    budget: usize,
    truncations: usize,
}

impl<W> Search<'_, W> {
    fn expand(&mut self, node: &mut Node<W>, pool: &[ActionId]) -> bool {
        let (planner, world) = (self.planner, self.world);
        node.required.retain(|fact| !fact.evaluate(world));
        if node.required.is_empty() {
            return true;
        }

        let key = (node.required.clone(), pool.to_vec());
        if self.failed.contains(&key) {
            return false;
        }
        let truncations = self.truncations;
        let is_root = node.action.is_none();

        for (slot, &id) in pool.iter().enumerate() {
            let action = &planner.actions[id.0];
            if action.effects().is_disjoint(&node.required) {
                continue;
            }
            if is_root {
                self.budget = planner.config.max_expansions;
            }
            if self.budget == 0 {
                self.truncations += 1;
                break;
            }
            self.budget -= 1;

            let mut required: FactSet<W> = node
                .required
                .difference(action.effects())
                .cloned()
                .collect();
            required.extend(action.preconditions().iter().cloned());

            let remaining: Vec<ActionId> = pool
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != slot)
                .map(|(_, &other)| other)
                .collect();

            let mut child = Node::step(id, required, node.cost + action.cost());
            let truncated_before = self.truncations;
            let found = self.expand(&mut child, &remaining);
            if is_root && self.truncations > truncated_before {
                tracing::warn!(
                    action = action.name(),
                    budget = planner.config.max_expansions,
                    "search budget exhausted on branch"
                );
            }
            if found {
                node.leaves.push(child);
            }
        }

        if node.leaves.is_empty() {
            if self.truncations == truncations {
                self.failed.insert(key);
            }
            return false;
        }
        true
    }
}

impl<W> core::fmt::Debug for GoapPlanner<W> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GoapPlanner")
            .field("actions", &self.actions)
            .field("config", &self.config)
            .finish()
    }
}
