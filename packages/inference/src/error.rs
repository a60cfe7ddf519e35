use thiserror::Error;

/// Raised when an analysis record does not match the tree being annotated
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Malformed analysis: '{declaration}' refers to unknown interface '{name}'")]
    UnknownInterface { name: String, declaration: String },

    #[error("Malformed analysis: no function definition recorded for '{name}' at offset {offset}")]
    MissingFunctionDefinition { name: String, offset: usize },

    #[error("Malformed analysis: function '{name}' has {found} parameters, analysis recorded {expected}")]
    ParameterMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

pub type InferenceResult<T> = Result<T, InferenceError>;
