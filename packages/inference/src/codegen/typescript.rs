use crate::codegen::CodeGenerator;
use crate::types::{ArrayShape, FunctionShape, ObjectShape, PrimitiveKind, TypeDescriptor};
use js2ts_parser::ast::{InterfaceDeclaration, PropertySignature, Span, TsType};
use js2ts_parser::serializer::property_key;

/// TypeScript generator for inferred types.
///
/// Produces both the textual spelling used in analysis output and the type
/// syntax nodes the annotator attaches to the tree. The two always agree:
/// serializing the syntax node yields the same text.
pub struct TypeScriptGenerator;

impl TypeScriptGenerator {
    pub fn new() -> Self {
        Self
    }

    /// `{ a: number; b: string }`, or `{}` when there are no fields
    pub fn generate_object(&self, shape: &ObjectShape) -> String {
        if shape.is_empty() {
            return "{}".to_string();
        }

        let fields: Vec<String> = shape
            .fields()
            .iter()
            .map(|(name, ty)| self.generate_field(name, ty))
            .collect();

        format!("{{ {} }}", fields.join("; "))
    }

    fn generate_array(&self, shape: &ArrayShape) -> String {
        let members: Vec<String> = match shape.element_types() {
            [single] => vec![self.generate_type(single)],
            many => many.iter().map(|ty| self.generate_union_member(ty)).collect(),
        };

        format!("Array<{}>", members.join(" | "))
    }

    fn generate_function(&self, func: &FunctionShape) -> String {
        let params: Vec<String> = func
            .params
            .iter()
            .map(|(name, ty)| format!("{}: {}", name, self.generate_type(ty)))
            .collect();

        format!(
            "({}) => {}",
            params.join(", "),
            self.generate_type(&func.return_type)
        )
    }

    /// Function types need parentheses inside a union
    fn generate_union_member(&self, ty: &TypeDescriptor) -> String {
        match ty {
            TypeDescriptor::Function(_) => format!("({})", self.generate_type(ty)),
            _ => self.generate_type(ty),
        }
    }

    /// Type syntax node for a descriptor, for attaching to the tree
    pub fn type_syntax(&self, ty: &TypeDescriptor) -> TsType {
        match ty {
            TypeDescriptor::Any => TsType::Any,
            TypeDescriptor::Primitive(kind) => match kind {
                PrimitiveKind::Number => TsType::Number,
                PrimitiveKind::String => TsType::String,
                PrimitiveKind::Boolean => TsType::Boolean,
                PrimitiveKind::Null => TsType::Null,
                PrimitiveKind::Void => TsType::Void,
            },
            TypeDescriptor::Object(shape) => TsType::TypeLiteral {
                members: self.property_signatures(shape),
            },
            TypeDescriptor::Array(shape) => {
                let element = match shape.element_types() {
                    [single] => self.type_syntax(single),
                    many => TsType::Union {
                        types: many.iter().map(|ty| self.type_syntax(ty)).collect(),
                    },
                };
                TsType::array_of(element)
            }
            TypeDescriptor::Function(func) => TsType::Function {
                params: func
                    .params
                    .iter()
                    .map(|(name, ty)| PropertySignature {
                        key: name.clone(),
                        type_annotation: self.type_syntax(ty),
                    })
                    .collect(),
                return_type: Box::new(self.type_syntax(&func.return_type)),
            },
            TypeDescriptor::InterfaceRef(name) => TsType::reference(name.clone()),
        }
    }

    /// `interface Name { ... }` declaration node for a synthesized interface
    pub fn interface_declaration(&self, name: &str, shape: &ObjectShape) -> InterfaceDeclaration {
        InterfaceDeclaration {
            name: name.to_string(),
            body: self.property_signatures(shape),
            span: Span::synthetic(),
        }
    }

    fn property_signatures(&self, shape: &ObjectShape) -> Vec<PropertySignature> {
        shape
            .fields()
            .iter()
            .map(|(key, ty)| PropertySignature {
                key: key.clone(),
                type_annotation: self.type_syntax(ty),
            })
            .collect()
    }
}

impl Default for TypeScriptGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for TypeScriptGenerator {
    fn generate_type(&self, ty: &TypeDescriptor) -> String {
        match ty {
            TypeDescriptor::Any => "any".to_string(),
            TypeDescriptor::Primitive(kind) => kind.keyword().to_string(),
            TypeDescriptor::Object(shape) => self.generate_object(shape),
            TypeDescriptor::Array(shape) => self.generate_array(shape),
            TypeDescriptor::Function(func) => self.generate_function(func),
            TypeDescriptor::InterfaceRef(name) => name.clone(),
        }
    }

    fn generate_field(&self, name: &str, ty: &TypeDescriptor) -> String {
        format!("{}: {}", property_key(name), self.generate_type(ty))
    }

    fn generate_interface(&self, name: &str, shape: &ObjectShape) -> String {
        if shape.is_empty() {
            return format!("interface {} {{}}", name);
        }
        format!("interface {} {}", name, self.generate_object(shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use js2ts_parser::ast::{Program, Statement};
    use js2ts_parser::{parse_with_options, ParseOptions, Serializer};

    fn object(fields: Vec<(&str, TypeDescriptor)>) -> ObjectShape {
        fields.into_iter().collect()
    }

    #[test]
    fn test_generate_primitive_types() {
        let gen = TypeScriptGenerator::new();

        assert_eq!(gen.generate_type(&TypeDescriptor::Any), "any");
        assert_eq!(gen.generate_type(&TypeDescriptor::number()), "number");
        assert_eq!(gen.generate_type(&TypeDescriptor::string()), "string");
        assert_eq!(gen.generate_type(&TypeDescriptor::boolean()), "boolean");
        assert_eq!(gen.generate_type(&TypeDescriptor::null()), "null");
        assert_eq!(gen.generate_type(&TypeDescriptor::void()), "void");
    }

    #[test]
    fn test_generate_object_type() {
        let gen = TypeScriptGenerator::new();
        let shape = object(vec![
            ("a", TypeDescriptor::number()),
            ("b", TypeDescriptor::string()),
        ]);

        assert_eq!(
            gen.generate_type(&TypeDescriptor::Object(shape)),
            "{ a: number; b: string }"
        );
        assert_eq!(gen.generate_type(&TypeDescriptor::Object(ObjectShape::new())), "{}");
    }

    #[test]
    fn test_generate_quotes_non_identifier_keys() {
        let gen = TypeScriptGenerator::new();
        let shape = object(vec![("data-id", TypeDescriptor::number())]);

        assert_eq!(gen.generate_object(&shape), "{ \"data-id\": number }");
    }

    #[test]
    fn test_generate_array_type() {
        let gen = TypeScriptGenerator::new();

        let single = ArrayShape::from_elements(vec![TypeDescriptor::string()]);
        assert_eq!(gen.generate_type(&TypeDescriptor::Array(single)), "Array<string>");

        let union = ArrayShape::from_elements(vec![
            TypeDescriptor::number(),
            TypeDescriptor::string(),
            TypeDescriptor::boolean(),
        ]);
        assert_eq!(
            gen.generate_type(&TypeDescriptor::Array(union)),
            "Array<number | string | boolean>"
        );

        let empty = ArrayShape::from_elements(vec![]);
        assert_eq!(gen.generate_type(&TypeDescriptor::Array(empty)), "Array<any>");
    }

    #[test]
    fn test_generate_function_type() {
        let gen = TypeScriptGenerator::new();
        let func = FunctionShape::new(
            vec![
                ("a".to_string(), TypeDescriptor::number()),
                ("b".to_string(), TypeDescriptor::number()),
            ],
            TypeDescriptor::number(),
        );

        assert_eq!(
            gen.generate_type(&TypeDescriptor::Function(func)),
            "(a: number, b: number) => number"
        );
    }

    #[test]
    fn test_generate_interface() {
        let gen = TypeScriptGenerator::new();
        let shape = object(vec![
            ("name", TypeDescriptor::string()),
            ("age", TypeDescriptor::number()),
        ]);

        assert_eq!(
            gen.generate_interface("User", &shape),
            "interface User { name: string; age: number }"
        );
        assert_eq!(
            gen.generate_interface("Empty", &ObjectShape::new()),
            "interface Empty {}"
        );
    }

    #[test]
    fn test_type_syntax_matches_rendered_text() {
        let gen = TypeScriptGenerator::new();
        let nested = TypeDescriptor::Object(object(vec![
            ("id", TypeDescriptor::number()),
            (
                "tags",
                TypeDescriptor::Array(ArrayShape::from_elements(vec![
                    TypeDescriptor::string(),
                    TypeDescriptor::null(),
                ])),
            ),
            ("owner", TypeDescriptor::InterfaceRef("User".to_string())),
        ]));

        let mut program = Program::new();
        let source = format!("let x: {} = 1;", nested.render());
        let parsed = parse_with_options(&source, ParseOptions::typescript()).unwrap();
        let Statement::VariableDeclaration(decl) = &parsed.body[0] else {
            panic!("Expected variable declaration");
        };

        assert_eq!(
            decl.declarations[0].id.type_annotation,
            Some(gen.type_syntax(&nested))
        );

        program.body.push(Statement::Interface(gen.interface_declaration(
            "Nested",
            &object(vec![("flag", TypeDescriptor::boolean())]),
        )));
        assert_eq!(
            Serializer::compact().serialize(&program),
            "interface Nested{flag:boolean;}"
        );
    }
}
