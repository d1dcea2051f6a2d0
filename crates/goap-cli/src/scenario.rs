//! Scenario loading for `goap-sim`.

use std::path::Path;

use anyhow::{Context, Result};
use goap_core::Position;
use goap_planner::{GoapAgentConfig, PlannerConfig};
use serde::Deserialize;

/// Simulation setup, loaded from a YAML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Scenario {
    /// Number of ticks to simulate
    #[serde(default = "default_ticks")]
    pub ticks: u64,

    /// Seconds per tick
    #[serde(default = "default_dt")]
    pub dt_seconds: f32,

    pub seed: u64,

    /// Agent movement speed in units per second
    #[serde(default = "default_speed")]
    pub speed: f32,

    pub start: Position,

    #[serde(default = "default_idle_seconds")]
    pub idle_seconds: f32,

    #[serde(default = "default_wander_radius")]
    pub wander_radius: f32,

    pub priorities: Priorities,

    #[serde(default = "default_resources")]
    pub resources: Vec<ResourceConfig>,

    /// Stock changes applied during the run; each one interrupts the agent
    pub restocks: Vec<Restock>,

    pub planner: PlannerConfig,

    pub agent: GoapAgentConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Priorities {
    pub relax: f32,
    pub wander: f32,
    pub stock: f32,
}

impl Default for Priorities {
    fn default() -> Self {
        Self {
            relax: 1.0,
            wander: 1.0,
            stock: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceConfig {
    pub name: String,

    /// Units available at the site
    #[serde(default)]
    pub stock: u32,

    pub position: Position,

    #[serde(default = "default_collect_cost")]
    pub cost: f32,

    /// Units the agent wants to carry
    #[serde(default = "default_want")]
    pub want: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Restock {
    pub tick: u64,
    pub resource: String,
    pub amount: u32,
}

fn default_ticks() -> u64 {
    200
}
fn default_dt() -> f32 {
    0.1
}
fn default_speed() -> f32 {
    2.0
}
fn default_idle_seconds() -> f32 {
    2.0
}
fn default_wander_radius() -> f32 {
    5.0
}
fn default_collect_cost() -> f32 {
    2.0
}
fn default_want() -> u32 {
    1
}
fn default_resources() -> Vec<ResourceConfig> {
    vec![
        ResourceConfig {
            name: "Food".to_string(),
            stock: 3,
            position: Position::new(8.0, 0.0),
            cost: default_collect_cost(),
            want: default_want(),
        },
        ResourceConfig {
            name: "Wood".to_string(),
            stock: 0,
            position: Position::new(-6.0, 4.0),
            cost: default_collect_cost(),
            want: default_want(),
        },
    ]
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            ticks: default_ticks(),
            dt_seconds: default_dt(),
            seed: 0,
            speed: default_speed(),
            start: Position::default(),
            idle_seconds: default_idle_seconds(),
            wander_radius: default_wander_radius(),
            priorities: Priorities::default(),
            resources: default_resources(),
            restocks: Vec::new(),
            planner: PlannerConfig::default(),
            agent: GoapAgentConfig::default(),
        }
    }
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse scenario from {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let scenario: Self = serde_yaml::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load `path` when given, otherwise the built-in village.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.dt_seconds.is_finite() && self.dt_seconds > 0.0,
            "dt_seconds must be positive, got {}",
            self.dt_seconds
        );
        anyhow::ensure!(
            self.speed.is_finite() && self.speed >= 0.0,
            "speed must be non-negative, got {}",
            self.speed
        );
        for restock in &self.restocks {
            anyhow::ensure!(
                self.resources.iter().any(|r| r.name == restock.resource),
                "restock at tick {} names unknown resource `{}`",
                restock.tick,
                restock.resource
            );
        }
        Ok(())
    }
}
