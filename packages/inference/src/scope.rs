use crate::types::TypeDescriptor;
use std::collections::HashMap;

/// Naming context for inference: identifier name to known type.
///
/// Only function parameter hints are ever bound; everything else infers
/// against an empty scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    bindings: HashMap<String, TypeDescriptor>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name, replacing any previous binding
    pub fn bind(&mut self, name: impl Into<String>, ty: TypeDescriptor) {
        self.bindings.insert(name.into(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeDescriptor> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, TypeDescriptor)> for Scope {
    fn from_iter<I: IntoIterator<Item = (K, TypeDescriptor)>>(iter: I) -> Self {
        let mut scope = Scope::new();
        for (name, ty) in iter {
            scope.bind(name, ty);
        }
        scope
    }
}
