use thiserror::Error;

/// Setup-time configuration errors.
///
/// Everything here is detected while building facts, actions, goals or the planner, never during a
/// search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("action `{action}` has no execution strategy")]
    MissingStrategy { action: String },

    #[error("action `{action}` has invalid cost {cost} (must be finite and non-negative)")]
    InvalidCost { action: String, cost: f32 },

    #[error("action `{action}` has no effects and can never be planned")]
    NoEffects { action: String },

    #[error("action `{action}` lists `{fact}` as both a precondition and an effect")]
    CircularAction { action: String, fact: String },

    #[error("goal `{goal}` has no desired effects")]
    EmptyGoal { goal: String },

    #[error("goal `{goal}` has invalid priority {priority}")]
    InvalidPriority { goal: String, priority: f32 },

    #[error("duplicate action name `{0}`")]
    DuplicateAction(String),

    #[error("duplicate goal name `{0}`")]
    DuplicateGoal(String),

    #[error("duplicate fact name `{0}`")]
    DuplicateFact(String),

    #[error("unknown fact `{0}`")]
    UnknownFact(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
