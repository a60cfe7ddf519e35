use crate::analysis::AnalysisRecord;
use crate::codegen::typescript::TypeScriptGenerator;
use crate::error::{InferenceError, InferenceResult};
use crate::options::{InferenceOptions, ReturnAnnotations};
use crate::types::{PrimitiveKind, TypeDescriptor};
use js2ts_common::visitor::{walk_function_mut, walk_variable_declaration_mut, VisitorMut};
use js2ts_parser::ast::*;
use tracing::debug;

/// Rewrite a program so it carries the annotations of `record`.
///
/// Interfaces are prepended in table order, declarators and functions get
/// type annotations. Fails when the record does not describe this tree.
pub fn annotate(
    mut program: Program,
    record: &AnalysisRecord,
    options: &InferenceOptions,
) -> InferenceResult<Program> {
    let mut annotator = Annotator::new(record, options);
    annotator.visit_program_mut(&mut program);
    annotator.finish()?;
    Ok(program)
}

/// Pass 2 visitor. Stops rewriting at the first error.
pub struct Annotator<'r> {
    record: &'r AnalysisRecord,
    options: &'r InferenceOptions,
    generator: TypeScriptGenerator,
    error: Option<InferenceError>,
}

impl<'r> Annotator<'r> {
    pub fn new(record: &'r AnalysisRecord, options: &'r InferenceOptions) -> Self {
        Self {
            record,
            options,
            generator: TypeScriptGenerator::new(),
            error: None,
        }
    }

    pub fn finish(self) -> InferenceResult<()> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fail(&mut self, error: InferenceError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    fn interface_declarations(&self) -> Vec<Statement> {
        self.record
            .interfaces
            .iter()
            .map(|(name, shape)| {
                Statement::Interface(self.generator.interface_declaration(name, shape))
            })
            .collect()
    }

    fn annotate_declarator(&mut self, declarator: &mut VariableDeclarator) -> InferenceResult<()> {
        let name = &declarator.id.name;
        let ty = self
            .record
            .type_annotations
            .get(name)
            .unwrap_or(&TypeDescriptor::Any);

        if let Some(missing) = unresolved_interface(ty, self.record) {
            return Err(InferenceError::UnknownInterface {
                name: missing.to_string(),
                declaration: name.clone(),
            });
        }

        declarator.id.type_annotation = Some(self.generator.type_syntax(ty));
        Ok(())
    }

    fn annotate_function(&mut self, function: &mut Function) -> InferenceResult<()> {
        let name = function.name().unwrap_or("anonymous").to_string();
        let fact = self.record.function_at(function.span).ok_or_else(|| {
            InferenceError::MissingFunctionDefinition {
                name: name.clone(),
                offset: function.span.start,
            }
        })?;

        if fact.params.len() != function.params.len() {
            return Err(InferenceError::ParameterMismatch {
                name,
                expected: fact.params.len(),
                found: function.params.len(),
            });
        }

        for (param, hint) in function.params.iter_mut().zip(&fact.params) {
            param.type_annotation = Some(self.generator.type_syntax(&hint.ts_type));
        }

        let return_type = match self.options.return_annotations {
            ReturnAnnotations::Full => fact.return_type.clone(),
            ReturnAnnotations::Narrow if fact.return_type.is_primitive(PrimitiveKind::Number) => {
                TypeDescriptor::number()
            }
            ReturnAnnotations::Narrow => TypeDescriptor::Any,
        };
        debug!(function = %name, returns = %return_type, "annotated function");
        function.return_type = Some(self.generator.type_syntax(&return_type));

        Ok(())
    }
}

impl VisitorMut for Annotator<'_> {
    fn visit_program_mut(&mut self, program: &mut Program) {
        for statement in &mut program.body {
            if self.error.is_some() {
                return;
            }
            self.visit_statement_mut(statement);
        }

        if self.error.is_none() {
            let interfaces = self.interface_declarations();
            program.body.splice(0..0, interfaces);
        }
    }

    fn visit_variable_declaration_mut(&mut self, declaration: &mut VariableDeclaration) {
        for declarator in &mut declaration.declarations {
            if let Err(error) = self.annotate_declarator(declarator) {
                self.fail(error);
                return;
            }
        }
        walk_variable_declaration_mut(self, declaration);
    }

    fn visit_function_mut(&mut self, function: &mut Function) {
        if let Err(error) = self.annotate_function(function) {
            self.fail(error);
            return;
        }
        walk_function_mut(self, function);
    }
}

/// First interface referenced by `ty` that the record does not define
fn unresolved_interface<'t>(ty: &'t TypeDescriptor, record: &AnalysisRecord) -> Option<&'t str> {
    match ty {
        TypeDescriptor::InterfaceRef(name) if !record.interfaces.contains_key(name) => {
            Some(name.as_str())
        }
        TypeDescriptor::Object(shape) => shape
            .fields()
            .iter()
            .find_map(|(_, field)| unresolved_interface(field, record)),
        TypeDescriptor::Array(shape) => shape
            .element_types()
            .iter()
            .find_map(|element| unresolved_interface(element, record)),
        TypeDescriptor::Function(func) => func
            .params
            .iter()
            .map(|(_, param)| param)
            .chain(std::iter::once(func.return_type.as_ref()))
            .find_map(|ty| unresolved_interface(ty, record)),
        _ => None,
    }
}
