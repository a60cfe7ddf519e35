use crate::inference::InferenceEngine;
use crate::scope::Scope;
use crate::types::{FunctionShape, ObjectShape, TypeDescriptor};
use indexmap::IndexMap;
use js2ts_common::visitor::{walk_expression, walk_function, walk_variable_declaration, Visitor};
use js2ts_parser::ast::*;
use serde::Serialize;
use tracing::{debug, info};

/// Everything pass 1 learned about a program.
///
/// Built once by [`analyze`] and only read afterwards. The two tables drive
/// the annotator; the fact lists are informational and back the `analyze`
/// command's JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub variable_declarations: Vec<VariableDeclarationFact>,
    pub function_definitions: Vec<FunctionFact>,
    pub return_statements: Vec<ReturnFact>,
    pub object_literals: Vec<ObjectLiteralFact>,
    pub array_literals: Vec<ArrayLiteralFact>,

    /// Identifier name (and `<function>_return`) to annotation type
    pub type_annotations: IndexMap<String, TypeDescriptor>,

    /// Synthesized interface name to its shape
    pub interfaces: IndexMap<String, ObjectShape>,
}

impl AnalysisRecord {
    /// Fact for the function whose source span is `span`
    pub fn function_at(&self, span: Span) -> Option<&FunctionFact> {
        self.function_definitions.iter().find(|f| f.span == span)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDeclarationFact {
    pub kind: DeclarationKind,
    pub declarations: Vec<DeclaratorFact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaratorFact {
    pub name: String,
    /// Node kind of the initializer, `undefined` when there is none
    pub init_kind: String,
    pub ts_type: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionFact {
    /// Function name, `anonymous` for unnamed function expressions
    pub name: String,
    pub params: Vec<ParamFact>,
    pub return_type: TypeDescriptor,
    pub signature: TypeDescriptor,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamFact {
    pub name: String,
    pub ts_type: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnFact {
    /// Node kind of the argument, `none` for a bare `return`
    pub argument_kind: String,
    pub ts_type: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectLiteralFact {
    pub properties: Vec<PropertyFact>,
    pub ts_type: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFact {
    pub key: String,
    pub value_kind: String,
    pub ts_type: TypeDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayLiteralFact {
    /// Node kind per element, `undefined` for holes
    pub element_kinds: Vec<String>,
    pub ts_type: TypeDescriptor,
}

/// Analyze a program in one pre-order traversal
pub fn analyze(program: &Program, engine: &mut InferenceEngine) -> AnalysisRecord {
    let mut collector = AnalysisCollector::new(engine);
    collector.visit_program(program);
    let record = collector.finish();

    info!(
        declarations = record.variable_declarations.len(),
        functions = record.function_definitions.len(),
        interfaces = record.interfaces.len(),
        "analysis complete"
    );

    record
}

/// Pass 1 visitor filling an [`AnalysisRecord`]
pub struct AnalysisCollector<'e> {
    engine: &'e mut InferenceEngine,
    record: AnalysisRecord,
}

impl<'e> AnalysisCollector<'e> {
    pub fn new(engine: &'e mut InferenceEngine) -> Self {
        Self {
            engine,
            record: AnalysisRecord::default(),
        }
    }

    pub fn finish(self) -> AnalysisRecord {
        self.record
    }

    fn infer(&mut self, expr: Option<&Expression>) -> TypeDescriptor {
        self.engine.infer(expr, &Scope::new())
    }

    fn collect_declarator(&mut self, declarator: &VariableDeclarator) -> DeclaratorFact {
        let name = declarator.id.name.clone();
        let init = declarator.init.as_ref().map(Expression::unparenthesized);
        let ts_type = self.infer(init);

        let annotation = match (&ts_type, init) {
            (TypeDescriptor::Object(shape), Some(Expression::Object { .. }))
                if self.engine.options().synthesize_interfaces =>
            {
                let interface = interface_name(&name);
                debug!(variable = %name, interface = %interface, "synthesized interface");
                self.record.interfaces.insert(interface.clone(), shape.clone());
                TypeDescriptor::InterfaceRef(interface)
            }
            _ => ts_type.clone(),
        };
        self.record.type_annotations.insert(name.clone(), annotation);

        DeclaratorFact {
            name,
            init_kind: init
                .map(Expression::kind_name)
                .unwrap_or("undefined")
                .to_string(),
            ts_type,
        }
    }

    fn collect_function(&mut self, function: &Function) {
        let mut body = FunctionBodyScan::default();
        walk_function(&mut body, function);

        let params: Vec<ParamFact> = function
            .params
            .iter()
            .map(|param| ParamFact {
                name: param.name.clone(),
                ts_type: if body.numeric_operands.contains(&param.name) {
                    TypeDescriptor::number()
                } else {
                    TypeDescriptor::Any
                },
            })
            .collect();

        let hints: Scope = params
            .iter()
            .map(|param| (param.name.clone(), param.ts_type.clone()))
            .collect();

        // The last valued return wins
        let return_type = match &body.last_return {
            Some(argument) => self.engine.infer_expression(argument, &hints),
            None => TypeDescriptor::void(),
        };

        let name = function.name().unwrap_or("anonymous").to_string();
        for param in &params {
            self.record
                .type_annotations
                .insert(param.name.clone(), param.ts_type.clone());
        }
        self.record
            .type_annotations
            .insert(format!("{}_return", name), return_type.clone());

        let signature = TypeDescriptor::Function(FunctionShape::new(
            params
                .iter()
                .map(|param| (param.name.clone(), param.ts_type.clone()))
                .collect(),
            return_type.clone(),
        ));
        debug!(function = %name, signature = %signature, "function signature");

        self.record.function_definitions.push(FunctionFact {
            name,
            params,
            return_type,
            signature,
            span: function.span,
        });
    }
}

impl Visitor for AnalysisCollector<'_> {
    fn visit_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        let declarations = declaration
            .declarations
            .iter()
            .map(|declarator| self.collect_declarator(declarator))
            .collect();

        self.record
            .variable_declarations
            .push(VariableDeclarationFact {
                kind: declaration.kind,
                declarations,
            });

        walk_variable_declaration(self, declaration);
    }

    fn visit_function(&mut self, function: &Function) {
        self.collect_function(function);
        walk_function(self, function);
    }

    fn visit_return_statement(&mut self, statement: &ReturnStatement) {
        let fact = ReturnFact {
            argument_kind: statement
                .argument
                .as_ref()
                .map(|arg| arg.unparenthesized().kind_name())
                .unwrap_or("none")
                .to_string(),
            ts_type: match &statement.argument {
                Some(argument) => self.infer(Some(argument)),
                None => TypeDescriptor::void(),
            },
        };
        self.record.return_statements.push(fact);

        if let Some(argument) = &statement.argument {
            self.visit_expression(argument);
        }
    }

    fn visit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Object { properties, .. } => {
                let properties = properties
                    .iter()
                    .map(|property| PropertyFact {
                        key: property.key.name().to_string(),
                        value_kind: property.value.unparenthesized().kind_name().to_string(),
                        ts_type: self.infer(Some(&property.value)),
                    })
                    .collect();
                let ts_type = self.infer(Some(expr));
                self.record
                    .object_literals
                    .push(ObjectLiteralFact { properties, ts_type });
            }
            Expression::Array { elements, .. } => {
                let element_kinds = elements
                    .iter()
                    .map(|element| match element {
                        Some(element) => element.unparenthesized().kind_name().to_string(),
                        None => "undefined".to_string(),
                    })
                    .collect();
                let ts_type = self.infer(Some(expr));
                self.record.array_literals.push(ArrayLiteralFact {
                    element_kinds,
                    ts_type,
                });
            }
            _ => {}
        }

        walk_expression(self, expr);
    }
}

/// `user` becomes `User`
fn interface_name(variable: &str) -> String {
    let mut chars = variable.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Scans a function body, nested functions included, for `+` operands and
/// return sites.
#[derive(Default)]
struct FunctionBodyScan {
    numeric_operands: Vec<String>,
    last_return: Option<Expression>,
}

impl FunctionBodyScan {
    fn note_operand(&mut self, operand: &Expression) {
        if let Expression::Identifier { name, .. } = operand.unparenthesized() {
            if !self.numeric_operands.contains(name) {
                self.numeric_operands.push(name.clone());
            }
        }
    }
}

impl Visitor for FunctionBodyScan {
    fn visit_return_statement(&mut self, statement: &ReturnStatement) {
        if let Some(argument) = &statement.argument {
            self.last_return = Some(argument.clone());
            self.visit_expression(argument);
        }
    }

    fn visit_expression(&mut self, expr: &Expression) {
        if let Expression::Binary {
            left,
            operator: BinaryOp::Add,
            right,
            ..
        } = expr
        {
            self.note_operand(left);
            self.note_operand(right);
        }
        walk_expression(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::InferenceOptions;
    use js2ts_parser::parse;

    fn analyze_source(source: &str) -> AnalysisRecord {
        let program = parse(source).unwrap();
        analyze(&program, &mut InferenceEngine::default())
    }

    fn annotation(record: &AnalysisRecord, name: &str) -> String {
        record.type_annotations[name].render()
    }

    #[test]
    fn test_variable_declarations() {
        let record = analyze_source("let x = 42, y; var s = 'a' + x;");

        assert_eq!(record.variable_declarations.len(), 2);
        let first = &record.variable_declarations[0];
        assert_eq!(first.kind, DeclarationKind::Let);
        assert_eq!(first.declarations[0].init_kind, "NumericLiteral");
        assert_eq!(first.declarations[1].init_kind, "undefined");
        assert_eq!(first.declarations[1].ts_type, TypeDescriptor::Any);

        assert_eq!(annotation(&record, "x"), "number");
        assert_eq!(annotation(&record, "y"), "any");
        assert_eq!(annotation(&record, "s"), "string");
    }

    #[test]
    fn test_object_literal_synthesizes_interface() {
        let record = analyze_source("const user = { name: 'Ada', age: 36 };");

        assert_eq!(
            record.type_annotations["user"],
            TypeDescriptor::InterfaceRef("User".to_string())
        );
        assert_eq!(
            record.interfaces["User"].fields(),
            &[
                ("name".to_string(), TypeDescriptor::string()),
                ("age".to_string(), TypeDescriptor::number()),
            ]
        );
        // The declaration fact keeps the raw shape
        assert_eq!(
            record.variable_declarations[0].declarations[0]
                .ts_type
                .render(),
            "{ name: string; age: number }"
        );
    }

    #[test]
    fn test_interface_synthesis_can_be_disabled() {
        let program = parse("const user = { name: 'Ada' };").unwrap();
        let mut engine = InferenceEngine::new(InferenceOptions {
            synthesize_interfaces: false,
            ..Default::default()
        });
        let record = analyze(&program, &mut engine);

        assert!(record.interfaces.is_empty());
        assert_eq!(annotation(&record, "user"), "{ name: string }");
    }

    #[test]
    fn test_function_hints_and_return() {
        let record = analyze_source("function add(a, b) { return a + b; }");
        let fact = &record.function_definitions[0];

        assert_eq!(fact.name, "add");
        assert_eq!(fact.params[0].ts_type, TypeDescriptor::number());
        assert_eq!(fact.params[1].ts_type, TypeDescriptor::number());
        assert_eq!(fact.return_type, TypeDescriptor::number());
        assert_eq!(fact.signature.render(), "(a: number, b: number) => number");
        assert_eq!(annotation(&record, "add_return"), "number");
        assert_eq!(annotation(&record, "a"), "number");
    }

    #[test]
    fn test_function_without_hints() {
        let record = analyze_source("function pick(a, b) { if (a) { return b; } return a * 2; }");
        let fact = &record.function_definitions[0];

        assert_eq!(fact.signature.render(), "(a: any, b: any) => any");
    }

    #[test]
    fn test_last_return_wins() {
        let record = analyze_source("function f(x) { if (x) { return 'a'; } return 1; }");
        assert_eq!(record.function_definitions[0].return_type, TypeDescriptor::number());
    }

    #[test]
    fn test_function_without_return_is_void() {
        let record = analyze_source("function log(msg) { print(msg); return; }");
        assert_eq!(record.function_definitions[0].return_type, TypeDescriptor::void());
        assert_eq!(annotation(&record, "log_return"), "void");
    }

    #[test]
    fn test_hint_from_nested_plus() {
        let record = analyze_source("function f(a, b) { const g = function () { return a + 1; }; return b; }");
        let fact = &record.function_definitions[0];

        assert_eq!(fact.params[0].ts_type, TypeDescriptor::number());
        assert_eq!(fact.params[1].ts_type, TypeDescriptor::Any);
        // The nested function is analyzed on its own as well
        assert_eq!(record.function_definitions[1].name, "anonymous");
    }

    #[test]
    fn test_return_in_nested_block_and_function() {
        let record = analyze_source(
            "function f(n) { while (n) { if (n) { return 'done'; } } const g = function () { return n + 1; }; }",
        );
        let fact = &record.function_definitions[0];

        // The nested function's return is the last one in source order
        assert_eq!(fact.return_type, TypeDescriptor::number());
        assert_eq!(fact.params[0].ts_type, TypeDescriptor::number());
    }

    #[test]
    fn test_parameter_hints_share_the_name_table() {
        let record = analyze_source("let a = 'x'; function add(a, b) { return a + b; }");

        // Annotations are keyed by name alone, so the parameter hint
        // replaces the earlier variable's entry
        assert_eq!(
            record.variable_declarations[0].declarations[0].ts_type,
            TypeDescriptor::string()
        );
        assert_eq!(annotation(&record, "a"), "number");
        assert_eq!(record.type_annotations.len(), 3);
    }

    #[test]
    fn test_return_facts() {
        let record = analyze_source("function f(a) { if (a) { return; } return [a]; }");

        let kinds: Vec<&str> = record
            .return_statements
            .iter()
            .map(|r| r.argument_kind.as_str())
            .collect();
        assert_eq!(kinds, vec!["none", "ArrayExpression"]);
        assert_eq!(record.return_statements[0].ts_type, TypeDescriptor::void());
        // Standalone return facts use an empty context
        assert_eq!(record.return_statements[1].ts_type.render(), "Array<any>");
    }

    #[test]
    fn test_literal_facts() {
        let record = analyze_source("f({ a: [1, , 'x'] });");

        assert_eq!(record.object_literals.len(), 1);
        let object = &record.object_literals[0];
        assert_eq!(object.properties[0].key, "a");
        assert_eq!(object.properties[0].value_kind, "ArrayExpression");
        assert_eq!(object.ts_type.render(), "{ a: Array<number | string> }");

        assert_eq!(record.array_literals.len(), 1);
        assert_eq!(
            record.array_literals[0].element_kinds,
            vec!["NumericLiteral", "undefined", "StringLiteral"]
        );
    }

    #[test]
    fn test_analysis_is_repeatable() {
        let program = parse(
            "let x = 1; const o = { a: [x, 'y'] }; function f(p) { return p + 1; }",
        )
        .unwrap();

        let first = analyze(&program, &mut InferenceEngine::default());
        let mut engine = InferenceEngine::default();
        for _ in 0..10 {
            assert_eq!(analyze(&program, &mut engine), first);
        }
    }

    #[test]
    fn test_record_serializes_to_json() {
        let record = analyze_source("const obj = { a: 1 };");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["typeAnnotations"]["obj"], "Obj");
        assert_eq!(json["interfaces"]["Obj"], "{ a: number }");
        assert_eq!(
            json["variableDeclarations"][0]["declarations"][0]["initKind"],
            "ObjectExpression"
        );
    }

    #[test]
    fn test_interface_name() {
        assert_eq!(interface_name("user"), "User");
        assert_eq!(interface_name("Obj"), "Obj");
        assert_eq!(interface_name("_x"), "_x");
    }
}
