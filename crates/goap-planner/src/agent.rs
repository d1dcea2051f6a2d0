use core::fmt;
use std::collections::BTreeSet;

use goap_core::{ActionId, AgentAction, AgentGoal, ConfigError, Result, TickContext};
use goap_tools::{TraceEvent, TraceLog, Tracer};
#[cfg(feature = "serde")]
use serde::Deserialize;

use crate::{ActionPlan, GoapPlanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Deserialize), serde(default))]
pub struct GoapAgentConfig {
    /// Re-check a popped action's preconditions before starting it. When they no longer hold the
    /// plan is abandoned and the agent replans on the next tick.
    pub verify_preconditions_on_start: bool,
}

impl Default for GoapAgentConfig {
    fn default() -> Self {
        Self {
            verify_preconditions_on_start: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentPhase {
    Idle,
    Planning,
    Executing,
}

/// Tick-driven execution cursor around a [`GoapPlanner`].
///
/// Each tick:
/// - a pending interrupt stops the running action and discards the goal and plan;
/// - with no running action, the agent searches (only goals above the held goal's priority while a
///   plan is in progress) and starts the next action of the resulting plan;
/// - the running action is updated; on completion it is stopped, and once the plan is exhausted the
///   goal is recorded as the most recently completed one for goal hysteresis.
pub struct GoapAgent<W> {
    planner: GoapPlanner<W>,
    goals: Vec<AgentGoal<W>>,
    config: GoapAgentConfig,
    phase: AgentPhase,
    current_goal: Option<AgentGoal<W>>,
    last_goal: Option<AgentGoal<W>>,
    plan: Option<ActionPlan<W>>,
    current_action: Option<ActionId>,
    interrupt_requested: bool,
    plan_calls: u64,
    plans_completed: u64,
    tracer: Tracer,
}

impl<W> GoapAgent<W> {
    pub fn new(planner: GoapPlanner<W>, goals: Vec<AgentGoal<W>>) -> Result<Self> {
        let mut names = BTreeSet::new();
        for goal in &goals {
            if !names.insert(goal.name()) {
                return Err(ConfigError::DuplicateGoal(goal.name().to_string()));
            }
        }

        Ok(Self {
            planner,
            goals,
            config: GoapAgentConfig::default(),
            phase: AgentPhase::Idle,
            current_goal: None,
            last_goal: None,
            plan: None,
            current_action: None,
            interrupt_requested: false,
            plan_calls: 0,
            plans_completed: 0,
            tracer: Tracer::new(),
        })
    }

    pub fn with_config(mut self, config: GoapAgentConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_tracer(mut self, tracer: Tracer) -> Self {
        self.tracer = tracer;
        self
    }

    pub fn planner(&self) -> &GoapPlanner<W> {
        &self.planner
    }

    pub fn goals(&self) -> &[AgentGoal<W>] {
        &self.goals
    }

    pub fn phase(&self) -> AgentPhase {
        self.phase
    }

    pub fn current_goal(&self) -> Option<&AgentGoal<W>> {
        self.current_goal.as_ref()
    }

    /// The goal whose plan most recently ran to completion.
    pub fn last_goal(&self) -> Option<&AgentGoal<W>> {
        self.last_goal.as_ref()
    }

    pub fn plan(&self) -> Option<&ActionPlan<W>> {
        self.plan.as_ref()
    }

    pub fn current_action_id(&self) -> Option<ActionId> {
        self.current_action
    }

    pub fn current_action(&self) -> Option<&AgentAction<W>> {
        self.planner.action(self.current_action?)
    }

    /// Number of times the planner was invoked.
    pub fn plan_calls(&self) -> u64 {
        self.plan_calls
    }

    /// Number of plans run to their last action.
    pub fn plans_completed(&self) -> u64 {
        self.plans_completed
    }

    pub fn trace_log(&self) -> Option<&TraceLog> {
        self.tracer.log()
    }

    /// Signal that the agent's target changed. Takes effect at the start of the next tick.
    pub fn interrupt(&mut self) {
        self.interrupt_requested = true;
    }

    pub fn tick(&mut self, ctx: &TickContext, world: &mut W) {
        if self.interrupt_requested {
            self.apply_interrupt(ctx, world);
        }

        if self.current_action.is_none() {
            self.calculate_plan(ctx, world);
            self.start_next_action(ctx, world);
        }

        self.drive_current(ctx, world);
    }

    fn apply_interrupt(&mut self, ctx: &TickContext, world: &mut W) {
        self.interrupt_requested = false;

        if let Some(id) = self.current_action.take() {
            if let Some(action) = self.planner.action_mut(id) {
                action.stop(ctx, world);
            }
        }
        self.plan = None;
        self.phase = AgentPhase::Idle;

        let mut event = TraceEvent::new(ctx.tick, "goap.interrupted");
        if let Some(goal) = self.current_goal.take() {
            tracing::info!(goal = goal.name(), "target changed, discarding plan");
            event = event.with_goal(goal.name());
        }
        self.tracer.emit(event);
    }

    fn calculate_plan(&mut self, ctx: &TickContext, world: &W) {
        self.phase = AgentPhase::Planning;
        self.plan_calls = self.plan_calls.saturating_add(1);
        self.tracer
            .emit(TraceEvent::new(ctx.tick, "goap.plan.call"));

        let floor = self.current_goal.as_ref().map(|g| g.priority());
        let candidates = self
            .goals
            .iter()
            .filter(|goal| floor.map_or(true, |p| goal.priority() > p));

        let Some(found) = self.planner.plan(candidates, self.last_goal.as_ref(), world) else {
            if self.plan.is_none() {
                self.tracer
                    .emit(TraceEvent::new(ctx.tick, "goap.plan.none"));
            }
            return;
        };

        let goal_name = found.goal().name().to_string();
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.plan.found")
                .with_goal(goal_name.as_str())
                .with_cost(found.total_cost()),
        );
        if let Some(held) = self.current_goal.as_ref() {
            tracing::info!(from = held.name(), to = goal_name.as_str(), "goal preempted");
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.plan.preempted").with_goal(held.name()),
            );
        }
        tracing::info!(
            goal = goal_name.as_str(),
            steps = found.len(),
            cost = found.total_cost(),
            "goal selected"
        );

        self.current_goal = Some(found.goal().clone());
        self.plan = Some(found);
    }

    fn start_next_action(&mut self, ctx: &TickContext, world: &mut W) {
        self.phase = AgentPhase::Idle;

        let Some(plan) = self.plan.as_mut() else {
            return;
        };
        let Some(id) = plan.pop() else {
            self.plan = None;
            return;
        };
        let Some(action) = self.planner.action_mut(id) else {
            self.plan = None;
            return;
        };
        let goal_name = plan.goal().name().to_string();

        if self.config.verify_preconditions_on_start && !action.preconditions_met(world) {
            tracing::warn!(
                goal = goal_name.as_str(),
                action = action.name(),
                "preconditions no longer hold, abandoning plan"
            );
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.plan.abandoned")
                    .with_goal(goal_name)
                    .with_action(action.name()),
            );
            self.plan = None;
            self.current_goal = None;
            return;
        }

        tracing::debug!(goal = goal_name.as_str(), action = action.name(), "starting action");
        action.start(ctx, world);
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.action.start")
                .with_goal(goal_name)
                .with_action(action.name()),
        );
        self.current_action = Some(id);
        self.phase = AgentPhase::Executing;
    }

    fn drive_current(&mut self, ctx: &TickContext, world: &mut W) {
        let Some(id) = self.current_action else {
            return;
        };
        let Some(action) = self.planner.action_mut(id) else {
            self.current_action = None;
            self.phase = AgentPhase::Idle;
            return;
        };

        action.update(ctx, world);
        if !action.is_complete(world) {
            return;
        }

        action.stop(ctx, world);
        tracing::debug!(action = action.name(), "action complete");
        self.tracer.emit(
            TraceEvent::new(ctx.tick, "goap.action.complete").with_action(action.name()),
        );
        for fact in action.unmet_effects(world) {
            tracing::warn!(
                action = action.name(),
                fact = fact.name(),
                "effect not observed after completion"
            );
            self.tracer.emit(
                TraceEvent::new(ctx.tick, "goap.action.effect_unmet")
                    .with_action(action.name())
                    .with_fact(fact.name()),
            );
        }

        self.current_action = None;
        self.phase = AgentPhase::Idle;

        if self.plan.as_ref().map_or(true, ActionPlan::is_empty) {
            self.plan = None;
            if let Some(goal) = self.current_goal.take() {
                tracing::info!(goal = goal.name(), "plan complete");
                self.tracer
                    .emit(TraceEvent::new(ctx.tick, "goap.plan.complete").with_goal(goal.name()));
                self.plans_completed = self.plans_completed.saturating_add(1);
                self.last_goal = Some(goal);
            }
        }
    }
}

impl<W> fmt::Debug for GoapAgent<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoapAgent")
            .field("phase", &self.phase)
            .field("current_goal", &self.current_goal.as_ref().map(|g| g.name()))
            .field("last_goal", &self.last_goal.as_ref().map(|g| g.name()))
            .field("current_action", &self.current_action)
            .field("plan", &self.plan)
            .finish_non_exhaustive()
    }
}
