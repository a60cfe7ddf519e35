//! # js2ts Inference Engine
//!
//! Infers TypeScript types for JavaScript expressions and rewrites a parsed
//! program so it carries explicit annotations.
//!
//! ## Features
//!
//! - **Structural types**: primitives, object shapes, array element unions and
//!   function signatures
//! - **Memoized inference**: results are cached by node shape and resolved
//!   context
//! - **Parameter hints**: `a` is a `number` in `function f(a) { return a + 1; }`
//! - **Interface synthesis**: `const user = { ... }` gets `interface User`
//! - **Two passes**: [`analyze`] builds an [`AnalysisRecord`], [`annotate`]
//!   applies it
//!
//! ## Example
//!
//! ```rust
//! use js2ts_inference::{analyze, annotate, InferenceEngine, InferenceOptions};
//! use js2ts_parser::{parse, Serializer};
//!
//! let program = parse("const point = { x: 1, y: 2 };").unwrap();
//!
//! let options = InferenceOptions::default();
//! let mut engine = InferenceEngine::new(options.clone());
//! let record = analyze(&program, &mut engine);
//! let annotated = annotate(program, &record, &options).unwrap();
//!
//! assert_eq!(
//!     Serializer::compact().serialize(&annotated),
//!     "interface Point{x:number;y:number;}const point:Point={x:1,y:2};"
//! );
//! ```

pub mod analysis;
pub mod annotate;
pub mod cache;
pub mod codegen;
pub mod error;
pub mod inference;
pub mod options;
pub mod scope;
pub mod types;

// Re-export main types for convenience
pub use analysis::{analyze, AnalysisCollector, AnalysisRecord, FunctionFact};
pub use annotate::{annotate, Annotator};
pub use cache::{CacheKey, CacheStats, InferenceCache, NodeKind};
pub use codegen::{typescript::TypeScriptGenerator, CodeGenerator};
pub use error::{InferenceError, InferenceResult};
pub use inference::InferenceEngine;
pub use options::{InferenceOptions, ReturnAnnotations};
pub use scope::Scope;
pub use types::{ArrayShape, FunctionShape, ObjectShape, PrimitiveKind, TypeDescriptor};
