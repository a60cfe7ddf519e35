use serde::{Deserialize, Serialize};

/// How function return types are annotated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnAnnotations {
    /// Annotate the inferred return type, `void` when nothing is returned
    #[default]
    Full,

    /// Only `number` survives; every other return type is annotated `any`
    Narrow,
}

/// Configuration options for type inference and annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InferenceOptions {
    /// Memoize inference results by structural fingerprint
    pub memoize: bool,

    /// Give object-literal variables a named interface instead of an inline
    /// object type
    pub synthesize_interfaces: bool,

    pub return_annotations: ReturnAnnotations,
}

impl Default for InferenceOptions {
    fn default() -> Self {
        Self {
            memoize: true,
            synthesize_interfaces: true,
            return_annotations: ReturnAnnotations::Full,
        }
    }
}

impl InferenceOptions {
    /// Options with the narrow return vocabulary (`number` or `any`)
    pub fn narrow() -> Self {
        Self {
            return_annotations: ReturnAnnotations::Narrow,
            ..Default::default()
        }
    }

    /// Options with memoization disabled
    pub fn uncached() -> Self {
        Self {
            memoize: false,
            ..Default::default()
        }
    }
}
