use crate::cache::{CacheKey, InferenceCache};
use crate::options::InferenceOptions;
use crate::scope::Scope;
use crate::types::{ArrayShape, ObjectShape, PrimitiveKind, TypeDescriptor};
use js2ts_parser::ast::{BinaryOp, Expression};
use tracing::trace;

/// Memoized type inference over expressions
pub struct InferenceEngine {
    options: InferenceOptions,
    cache: InferenceCache,
}

impl InferenceEngine {
    /// Create a new inference engine with the given options
    pub fn new(options: InferenceOptions) -> Self {
        Self {
            options,
            cache: InferenceCache::new(),
        }
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    pub fn cache(&self) -> &InferenceCache {
        &self.cache
    }

    /// Infer the type of an optional expression; an absent node is `any`
    pub fn infer(&mut self, expr: Option<&Expression>, scope: &Scope) -> TypeDescriptor {
        match expr {
            Some(expr) => self.infer_expression(expr, scope),
            None => TypeDescriptor::Any,
        }
    }

    /// Infer the type of an expression. Never fails: anything the engine does
    /// not model is `any`.
    pub fn infer_expression(&mut self, expr: &Expression, scope: &Scope) -> TypeDescriptor {
        if !self.options.memoize {
            return self.compute(expr, scope);
        }

        let Some(key) = CacheKey::for_expression(expr, scope) else {
            return self.compute(expr, scope);
        };

        if let Some(ty) = self.cache.get(&key) {
            trace!(kind = ?key.kind, fingerprint = %key.fingerprint, "inference cache hit");
            return ty;
        }

        let ty = self.compute(expr, scope);
        self.cache.insert(key, ty.clone());
        ty
    }

    fn compute(&mut self, expr: &Expression, scope: &Scope) -> TypeDescriptor {
        match expr.unparenthesized() {
            Expression::Number { .. } => TypeDescriptor::number(),
            Expression::String { .. } => TypeDescriptor::string(),
            Expression::Boolean { .. } => TypeDescriptor::boolean(),
            Expression::Null { .. } => TypeDescriptor::null(),

            Expression::Identifier { name, .. } => {
                scope.lookup(name).cloned().unwrap_or(TypeDescriptor::Any)
            }

            Expression::Object { properties, .. } => {
                let mut shape = ObjectShape::new();
                for property in properties {
                    let ty = self.infer_expression(&property.value, scope);
                    shape.insert(property.key.name(), ty);
                }
                TypeDescriptor::Object(shape)
            }

            Expression::Array { elements, .. } => {
                let element_types: Vec<TypeDescriptor> = elements
                    .iter()
                    .map(|element| self.infer(element.as_ref(), scope))
                    .collect();
                TypeDescriptor::Array(ArrayShape::from_elements(element_types))
            }

            Expression::Binary {
                left,
                operator: BinaryOp::Add,
                right,
                ..
            } => {
                let left = self.infer_expression(left, scope);
                let right = self.infer_expression(right, scope);
                if left.is_primitive(PrimitiveKind::String)
                    || right.is_primitive(PrimitiveKind::String)
                {
                    TypeDescriptor::string()
                } else {
                    TypeDescriptor::number()
                }
            }

            _ => TypeDescriptor::Any,
        }
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(InferenceOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use js2ts_parser::ast::Statement;
    use js2ts_parser::parse;

    fn init(source: &str) -> Expression {
        match parse(source).unwrap().body.remove(0) {
            Statement::VariableDeclaration(mut decl) => decl.declarations.remove(0).init.unwrap(),
            other => panic!("Expected variable declaration, got {:?}", other),
        }
    }

    fn infer(source: &str) -> TypeDescriptor {
        let mut engine = InferenceEngine::default();
        engine.infer_expression(&init(source), &Scope::new())
    }

    #[test]
    fn test_infer_literals() {
        assert_eq!(infer("let x = 42;"), TypeDescriptor::number());
        assert_eq!(infer("let x = 'hi';"), TypeDescriptor::string());
        assert_eq!(infer("let x = false;"), TypeDescriptor::boolean());
        assert_eq!(infer("let x = null;"), TypeDescriptor::null());
        assert_eq!(infer("let x = ((7));"), TypeDescriptor::number());
    }

    #[test]
    fn test_infer_absent_node() {
        let mut engine = InferenceEngine::default();
        assert_eq!(engine.infer(None, &Scope::new()), TypeDescriptor::Any);
    }

    #[test]
    fn test_infer_object_literal() {
        let ty = infer("let x = { a: 1, 'b': 'two', 3: [true], nested: { c: null } };");
        assert_eq!(
            ty.render(),
            "{ a: number; b: string; \"3\": Array<boolean>; nested: { c: null } }"
        );
    }

    #[test]
    fn test_infer_array_literal() {
        assert_eq!(infer("let x = [1, 'two', true];").render(), "Array<number | string | boolean>");
        assert_eq!(infer("let x = [1, 2, 3];").render(), "Array<number>");
        assert_eq!(infer("let x = [];").render(), "Array<any>");
        assert_eq!(infer("let x = [, , ];").render(), "Array<any>");
        assert_eq!(infer("let x = [f(), 1];").render(), "Array<number>");
    }

    #[test]
    fn test_infer_binary_add() {
        assert_eq!(infer("let x = 1 + 2;"), TypeDescriptor::number());
        assert_eq!(infer("let x = 'a' + 2;"), TypeDescriptor::string());
        assert_eq!(infer("let x = 1 + ('a' + 1);"), TypeDescriptor::string());
        assert_eq!(infer("let x = a + b;"), TypeDescriptor::number());
    }

    #[test]
    fn test_other_operators_are_any() {
        assert_eq!(infer("let x = 1 - 2;"), TypeDescriptor::Any);
        assert_eq!(infer("let x = a === b;"), TypeDescriptor::Any);
        assert_eq!(infer("let x = !a;"), TypeDescriptor::Any);
        assert_eq!(infer("let x = f(1);"), TypeDescriptor::Any);
        assert_eq!(infer("let x = `t${1}`;"), TypeDescriptor::Any);
        assert_eq!(infer("let x = a ? 1 : 2;"), TypeDescriptor::Any);
        assert_eq!(infer("let x = function () {};"), TypeDescriptor::Any);
    }

    #[test]
    fn test_identifier_uses_scope() {
        let mut engine = InferenceEngine::default();
        let expr = init("let x = [a, b];");

        let scope: Scope = vec![("a", TypeDescriptor::number())].into_iter().collect();
        assert_eq!(engine.infer_expression(&expr, &scope).render(), "Array<number>");

        let scope: Scope = vec![("a", TypeDescriptor::string())].into_iter().collect();
        assert_eq!(engine.infer_expression(&expr, &scope).render(), "Array<string>");

        assert_eq!(
            engine.infer_expression(&expr, &Scope::new()).render(),
            "Array<any>"
        );
    }

    #[test]
    fn test_memoized_by_shape() {
        let mut engine = InferenceEngine::default();
        let scope = Scope::new();

        let first = engine.infer_expression(&init("let a = { a: 1 };"), &scope);
        let hits_before = engine.cache().stats().hits;
        let second = engine.infer_expression(&init("let b =   {a:1};"), &scope);

        assert_eq!(first, second);
        assert_eq!(engine.cache().stats().hits, hits_before + 1);
    }

    #[test]
    fn test_uncached_matches_cached() {
        let sources = [
            "let x = { a: 1, b: [1, 'x', { c: true }] };",
            "let x = 'a' + (1 + 2);",
            "let x = [null, , 3];",
        ];

        let mut cached = InferenceEngine::default();
        let mut uncached = InferenceEngine::new(InferenceOptions::uncached());

        for source in sources {
            let expr = init(source);
            assert_eq!(
                cached.infer_expression(&expr, &Scope::new()),
                uncached.infer_expression(&expr, &Scope::new())
            );
        }
        assert!(uncached.cache().is_empty());
    }

    #[test]
    fn test_inference_is_deterministic() {
        let expr = init("let x = { a: [1, 'b'], c: 1 + 'd', e: null };");
        let mut engine = InferenceEngine::default();
        let expected = engine.infer_expression(&expr, &Scope::new());

        for _ in 0..10 {
            assert_eq!(engine.infer_expression(&expr, &Scope::new()), expected);
            assert_eq!(
                InferenceEngine::default().infer_expression(&expr, &Scope::new()),
                expected
            );
        }
    }
}
