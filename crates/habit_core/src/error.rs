use thiserror::Error;

/// Failures at the edges of the habit engine. Toggle, remove and projection
/// never fail; only ingesting a collection and parsing text input can.
#[derive(Error, Debug)]
pub enum HabitError {
    #[error("habit `{id}` has an empty name")]
    EmptyName { id: String },

    #[error("habit id `{0}` appears more than once in the collection")]
    DuplicateId(String),

    #[error("`{0}` is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("unknown frequency `{0}` (expected daily or weekly)")]
    InvalidFrequency(String),

    #[error("unknown sort key `{0}` (expected name or frequency)")]
    InvalidSortKey(String),

    #[error("unknown frequency filter `{0}` (expected all, daily or weekly)")]
    InvalidFrequencyFilter(String),

    #[error("unknown notification permission `{0}` (expected granted, denied or default)")]
    InvalidPermission(String),

    #[error("unable to decode habit collection: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HabitError>;
