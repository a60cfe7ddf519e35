use crate::scope::Scope;
use crate::types::TypeDescriptor;
use js2ts_parser::ast::{Expression, PropertyKey};
use std::collections::HashMap;
use std::fmt::Write;

/// Expression kinds whose inferred type is worth memoizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    NumericLiteral,
    StringLiteral,
    BooleanLiteral,
    NullLiteral,
    ObjectExpression,
    ArrayExpression,
    BinaryExpression,
    Identifier,
}

/// Cache key: node kind plus a structural fingerprint.
///
/// Fingerprints ignore source positions, so two literals with the same
/// shape share an entry. Identifiers contribute their name and the type the
/// scope resolves them to, so the same shape under different scopes never
/// collides.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub kind: NodeKind,
    pub fingerprint: String,
}

impl CacheKey {
    /// Key for an expression, or `None` for kinds that are not memoized
    pub fn for_expression(expr: &Expression, scope: &Scope) -> Option<Self> {
        let expr = expr.unparenthesized();
        let kind = match expr {
            Expression::Number { .. } => NodeKind::NumericLiteral,
            Expression::String { .. } => NodeKind::StringLiteral,
            Expression::Boolean { .. } => NodeKind::BooleanLiteral,
            Expression::Null { .. } => NodeKind::NullLiteral,
            Expression::Object { .. } => NodeKind::ObjectExpression,
            Expression::Array { .. } => NodeKind::ArrayExpression,
            Expression::Binary { .. } => NodeKind::BinaryExpression,
            Expression::Identifier { .. } => NodeKind::Identifier,
            _ => return None,
        };

        let mut fingerprint = String::new();
        write_fingerprint(expr, scope, &mut fingerprint);

        Some(Self { kind, fingerprint })
    }
}

fn write_fingerprint(expr: &Expression, scope: &Scope, out: &mut String) {
    match expr.unparenthesized() {
        Expression::Number { value, .. } => {
            let _ = write!(out, "n{}", value);
        }
        Expression::String { value, .. } => {
            out.push('s');
            write_json_string(value, out);
        }
        Expression::Boolean { value, .. } => {
            let _ = write!(out, "b{}", value);
        }
        Expression::Null { .. } => out.push_str("null"),
        Expression::Identifier { name, .. } => {
            let _ = write!(out, "i{}", name);
            match scope.lookup(name) {
                Some(ty) => {
                    let _ = write!(out, "={:?}", ty);
                }
                None => out.push_str("=?"),
            }
        }
        Expression::Object { properties, .. } => {
            out.push('{');
            for property in properties {
                match &property.key {
                    PropertyKey::Identifier(name) => write_json_string(name, out),
                    PropertyKey::String { value, .. } | PropertyKey::Number { value, .. } => {
                        write_json_string(value, out)
                    }
                }
                out.push(':');
                write_fingerprint(&property.value, scope, out);
                out.push(',');
            }
            out.push('}');
        }
        Expression::Array { elements, .. } => {
            out.push('[');
            for element in elements {
                match element {
                    Some(element) => write_fingerprint(element, scope, out),
                    None => out.push('_'),
                }
                out.push(',');
            }
            out.push(']');
        }
        Expression::Binary {
            left,
            operator,
            right,
            ..
        } => {
            out.push('(');
            write_fingerprint(left, scope, out);
            out.push_str(operator.as_str());
            write_fingerprint(right, scope, out);
            out.push(')');
        }
        // Every other kind infers to `any` whatever its content
        _ => out.push('*'),
    }
}

fn write_json_string(value: &str, out: &mut String) {
    match serde_json::to_string(value) {
        Ok(escaped) => out.push_str(&escaped),
        Err(_) => {
            let _ = write!(out, "{:?}", value);
        }
    }
}

/// Hit/miss counters for one cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub entries: usize,
}

/// Memo table owned by one inference engine
#[derive(Debug, Default)]
pub struct InferenceCache {
    entries: HashMap<CacheKey, TypeDescriptor>,
    hits: usize,
    misses: usize,
}

impl InferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a key, counting the hit or miss
    pub fn get(&mut self, key: &CacheKey) -> Option<TypeDescriptor> {
        match self.entries.get(key) {
            Some(ty) => {
                self.hits += 1;
                Some(ty.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    pub fn insert(&mut self, key: CacheKey, ty: TypeDescriptor) {
        self.entries.insert(key, ty);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.entries.len(),
        }
    }
}
