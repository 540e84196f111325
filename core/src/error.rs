use thiserror::Error;

#[derive(Error, Debug)]
pub enum VizError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Concept '{id}' not found")]
    UnknownConcept { id: String },

    #[error("Parameter '{name}' not found")]
    UnknownParameter { name: String },

    #[error("Parameter '{name}' out of bounds: {value} not in [{min}, {max}]")]
    ParameterOutOfBounds {
        name:  String,
        value: f64,
        min:   f64,
        max:   f64,
    },

    #[error("Parameter '{name}' expects a {expected} value")]
    ParameterTypeMismatch {
        name:     String,
        expected: &'static str,
    },

    #[error("Action '{name}' not found")]
    UnknownAction { name: String },

    #[error("Message is empty")]
    EmptyMessage,

    #[error("A chat request is already in flight")]
    RequestInFlight,

    #[error("No answer selected")]
    NoAnswerSelected,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type VizResult<T> = Result<T, VizError>;
