pub mod typescript;

use crate::types::{ObjectShape, TypeDescriptor};

/// Plugin trait for turning inferred types into target-language text
pub trait CodeGenerator {
    /// Generate code for a single type
    fn generate_type(&self, ty: &TypeDescriptor) -> String;

    /// Generate code for a single field (name + type)
    fn generate_field(&self, name: &str, ty: &TypeDescriptor) -> String;

    /// Generate a complete named interface for an object shape
    fn generate_interface(&self, name: &str, shape: &ObjectShape) -> String;
}
