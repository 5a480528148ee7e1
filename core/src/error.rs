use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid budget: '{value}' (must be a positive amount of crores)")]
    InvalidBudget { value: String },

    #[error("Invalid timeframe: '{value}' (must be a positive whole number of years)")]
    InvalidTimeframe { value: String },

    #[error("Invalid allocation for '{category}': {value}")]
    InvalidAllocation { category: String, value: f64 },

    #[error("Unknown allocation category '{name}'")]
    UnknownCategory { name: String },

    #[error("Allocation category '{name}' is missing")]
    MissingCategory { name: String },

    #[error("Unknown policy '{name}'")]
    UnknownPolicy { name: String },

    #[error("Region '{id}' not found")]
    RegionNotFound { id: String },

    #[error("Invalid model configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SimResult<T> = Result<T, SimError>;
