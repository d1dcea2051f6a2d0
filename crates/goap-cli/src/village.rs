//! A small village: one agent walking between resource sites.

use std::collections::BTreeMap;

use anyhow::Result;
use goap_core::{
    AgentAction, AgentGoal, Fact, FactRegistry, IdleStrategy, MoveStrategy, Navigator, Position,
    WanderStrategy,
};
use goap_planner::{GoapAgent, GoapPlanner};

use crate::scenario::Scenario;

const ARRIVAL_RADIUS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct Site {
    pub name: String,
    pub position: Position,
    pub stock: u32,
    pub want: u32,
}

#[derive(Debug, Clone)]
pub struct Village {
    position: Position,
    destination: Option<Position>,
    speed: f32,
    sites: Vec<Site>,
    inventory: BTreeMap<String, u32>,
}

impl Village {
    pub fn new(scenario: &Scenario) -> Self {
        Self {
            position: scenario.start,
            destination: None,
            speed: scenario.speed,
            sites: scenario
                .resources
                .iter()
                .map(|r| Site {
                    name: r.name.clone(),
                    position: r.position,
                    stock: r.stock,
                    want: r.want,
                })
                .collect(),
            inventory: BTreeMap::new(),
        }
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn inventory(&self) -> &BTreeMap<String, u32> {
        &self.inventory
    }

    pub fn carried(&self, resource: &str) -> u32 {
        self.inventory.get(resource).copied().unwrap_or(0)
    }

    /// Move toward the destination; snaps onto it once within one step.
    pub fn advance(&mut self, dt_seconds: f32) {
        let Some(destination) = self.destination else {
            return;
        };
        let distance = self.position.distance(destination);
        let step = self.speed * dt_seconds;
        if distance <= step {
            self.position = destination;
            return;
        }
        let t = step / distance;
        self.position = Position::new(
            self.position.x + (destination.x - self.position.x) * t,
            self.position.y + (destination.y - self.position.y) * t,
        );
    }

    /// Add stock to a site. Returns `false` for an unknown resource.
    pub fn restock(&mut self, resource: &str, amount: u32) -> bool {
        match self.sites.iter_mut().find(|s| s.name == resource) {
            Some(site) => {
                site.stock = site.stock.saturating_add(amount);
                true
            }
            None => false,
        }
    }

    fn take(&mut self, site: usize) {
        let Some(site) = self.sites.get_mut(site) else {
            return;
        };
        if site.stock == 0 {
            tracing::warn!(resource = site.name.as_str(), "site empty on arrival");
            return;
        }
        site.stock -= 1;
        *self.inventory.entry(site.name.clone()).or_default() += 1;
        tracing::info!(
            resource = site.name.as_str(),
            left = site.stock,
            "collected"
        );
    }

    fn open_site(&self, site: usize) -> Option<Position> {
        self.sites
            .get(site)
            .filter(|s| s.stock > 0)
            .map(|s| s.position)
    }
}

impl Navigator for Village {
    fn position(&self) -> Position {
        self.position
    }

    fn set_destination(&mut self, destination: Position) {
        self.destination = Some(destination);
    }

    fn is_at_destination(&self) -> bool {
        self.destination
            .map_or(true, |d| self.position.distance(d) <= ARRIVAL_RADIUS)
    }

    fn stop_movement(&mut self) {
        self.destination = None;
    }
}

/// Facts, actions and goals of the village agent.
pub fn build_agent(scenario: &Scenario, village: &Village) -> Result<GoapAgent<Village>> {
    let mut facts = FactRegistry::new();
    let nothing = facts.insert(Fact::constant("Nothing", false))?;
    let moving = facts.add("AgentMoving", |w: &Village| w.destination.is_some())?;

    let mut actions = vec![
        AgentAction::builder("Relax")
            .with_strategy(IdleStrategy::new(scenario.idle_seconds))
            .add_effect(nothing.clone())
            .build()?,
        AgentAction::builder("WanderAround")
            .with_strategy(WanderStrategy::new(scenario.wander_radius))
            .add_effect(moving.clone())
            .build()?,
    ];
    let mut goals = vec![
        AgentGoal::builder("Chill")
            .with_priority(scenario.priorities.relax)
            .with_desired_effect(nothing)
            .build()?,
        AgentGoal::builder("Wander")
            .with_priority(scenario.priorities.wander)
            .with_desired_effect(moving)
            .build()?,
    ];

    for (index, site) in village.sites().iter().enumerate() {
        let available = facts.add(format!("{}Available", site.name), move |w: &Village| {
            w.open_site(index).is_some()
        })?;
        let resource = site.name.clone();
        let want = site.want;
        let stocked = facts.add(format!("{}Stocked", site.name), move |w: &Village| {
            w.carried(&resource) >= want
        })?;
        let cost = scenario
            .resources
            .get(index)
            .map_or(1.0, |r| r.cost);

        actions.push(
            AgentAction::builder(format!("Collect{}", site.name))
                .with_cost(cost)
                .with_strategy(MoveStrategy::new(
                    move |w: &Village| w.open_site(index),
                    move |w: &mut Village| w.take(index),
                ))
                .add_precondition(available)
                .add_effect(stocked.clone())
                .build()?,
        );
        goals.push(
            AgentGoal::builder(format!("Stock{}", site.name))
                .with_priority(scenario.priorities.stock)
                .with_desired_effect(stocked)
                .build()?,
        );
    }
    tracing::debug!(facts = ?facts, "village facts");

    let planner = GoapPlanner::new(actions)?.with_config(scenario.planner);
    let agent = GoapAgent::new(planner, goals)?.with_config(scenario.agent);
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use goap_core::TickContext;
    use goap_tools::Tracer;

    use super::*;
    use crate::scenario::ResourceConfig;

    fn scenario() -> Scenario {
        Scenario {
            speed: 10.0,
            resources: vec![ResourceConfig {
                name: "Food".to_string(),
                stock: 2,
                position: Position::new(3.0, 0.0),
                cost: 2.0,
                want: 1,
            }],
            ..Scenario::default()
        }
    }

    fn run(agent: &mut GoapAgent<Village>, village: &mut Village, ticks: u64) {
        let mut ctx = TickContext::new(0, 0.1);
        for _ in 0..ticks {
            agent.tick(&ctx, village);
            village.advance(ctx.dt_seconds);
            ctx = ctx.next();
        }
    }

    #[test]
    fn advance_walks_at_speed_and_snaps() {
        let mut village = Village::new(&scenario());
        village.set_destination(Position::new(3.0, 0.0));

        village.advance(0.1);
        assert_eq!(village.position(), Position::new(1.0, 0.0));
        village.advance(0.5);
        assert_eq!(village.position(), Position::new(3.0, 0.0));
        assert!(village.is_at_destination());
    }

    #[test]
    fn agent_collects_before_idling() {
        let scenario = scenario();
        let mut village = Village::new(&scenario);
        let mut agent = build_agent(&scenario, &village)
            .unwrap()
            .with_tracer(Tracer::new().with_log());

        run(&mut agent, &mut village, 10);
        assert_eq!(village.carried("Food"), 1);
        assert_eq!(village.sites()[0].stock, 1);

        let log = agent.trace_log().unwrap();
        let first = log.with_tag("goap.plan.found").next().unwrap();
        assert_eq!(first.goal.as_deref(), Some("StockFood"));
        assert_eq!(
            agent.plans_completed() as usize,
            log.with_tag("goap.plan.complete").count()
        );
    }

    #[test]
    fn built_agent_keeps_no_trace_history() {
        let scenario = scenario();
        let mut village = Village::new(&scenario);
        let mut agent = build_agent(&scenario, &village).unwrap();

        run(&mut agent, &mut village, 10);
        assert!(agent.trace_log().is_none());
        assert!(agent.plans_completed() >= 1);
    }

    #[test]
    fn empty_site_falls_back_to_leisure() {
        let mut scenario = scenario();
        scenario.resources[0].stock = 0;
        let mut village = Village::new(&scenario);
        let mut agent = build_agent(&scenario, &village).unwrap();

        run(&mut agent, &mut village, 1);
        assert_eq!(agent.current_goal().map(|g| g.name()), Some("Chill"));
    }

    #[test]
    fn restock_targets_known_sites_only() {
        let mut village = Village::new(&scenario());
        assert!(village.restock("Food", 3));
        assert_eq!(village.sites()[0].stock, 5);
        assert!(!village.restock("Gold", 1));
    }
}
