use crate::ast::*;

/// Serializer converts a syntax tree back to source code.
///
/// Two layouts are supported: pretty (one statement per line, configurable
/// indent) and compact (no optional whitespace at all). Comments and the
/// original formatting are not preserved.
pub struct Serializer {
    indent_level: usize,
    indent_string: String,
    compact: bool,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            indent_level: 0,
            indent_string: "  ".to_string(), // 2 spaces
            compact: false,
        }
    }

    pub fn with_indent(indent: &str) -> Self {
        Self {
            indent_level: 0,
            indent_string: indent.to_string(),
            compact: false,
        }
    }

    /// Minimal output: only the whitespace needed to keep tokens apart
    pub fn compact() -> Self {
        Self {
            indent_level: 0,
            indent_string: String::new(),
            compact: true,
        }
    }

    /// Serialize a Program to source code
    pub fn serialize(&mut self, program: &Program) -> String {
        let mut output = String::new();

        for statement in &program.body {
            self.serialize_statement(statement, &mut output);
        }

        output
    }

    fn serialize_statement(&mut self, statement: &Statement, output: &mut String) {
        self.write_indent(output);
        self.serialize_statement_inline(statement, output);
        self.newline(output);
    }

    /// Write a statement starting at the current position, without leading
    /// indent or trailing newline
    fn serialize_statement_inline(&mut self, statement: &Statement, output: &mut String) {
        match statement {
            Statement::VariableDeclaration(declaration) => {
                self.serialize_variable_declaration(declaration, output);
                self.push_token(output, ";");
            }

            Statement::FunctionDeclaration(function) => {
                self.serialize_function(function, output);
            }

            Statement::Return(ReturnStatement { argument, .. }) => {
                self.push_token(output, "return");
                if let Some(argument) = argument {
                    self.space(output);
                    self.serialize_expression(argument, output);
                }
                self.push_token(output, ";");
            }

            Statement::If {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.push_token(output, "if");
                self.space(output);
                self.push_token(output, "(");
                self.serialize_expression(test, output);
                self.push_token(output, ")");
                self.space(output);
                self.serialize_statement_inline(consequent, output);

                if let Some(alternate) = alternate {
                    self.space(output);
                    self.push_token(output, "else");
                    self.space(output);
                    self.serialize_statement_inline(alternate, output);
                }
            }

            Statement::While { test, body, .. } => {
                self.push_token(output, "while");
                self.space(output);
                self.push_token(output, "(");
                self.serialize_expression(test, output);
                self.push_token(output, ")");
                self.space(output);
                self.serialize_statement_inline(body, output);
            }

            Statement::Block { body, .. } => {
                self.serialize_block(body, output);
            }

            Statement::Expression { expression, .. } => {
                // `{` or `function` at statement start would parse as a
                // block or declaration
                if starts_ambiguously(expression) {
                    self.push_token(output, "(");
                    self.serialize_expression(expression, output);
                    self.push_token(output, ")");
                } else {
                    self.serialize_expression(expression, output);
                }
                self.push_token(output, ";");
            }

            Statement::Interface(interface) => {
                self.serialize_interface(interface, output);
            }

            Statement::Empty { .. } => {
                self.push_token(output, ";");
            }
        }
    }

    fn serialize_variable_declaration(
        &mut self,
        declaration: &VariableDeclaration,
        output: &mut String,
    ) {
        self.push_token(output, declaration.kind.as_str());
        self.space(output);

        for (i, declarator) in declaration.declarations.iter().enumerate() {
            if i > 0 {
                self.push_token(output, ",");
                self.space(output);
            }

            self.serialize_binding(&declarator.id, output);

            if let Some(init) = &declarator.init {
                self.space(output);
                self.push_token(output, "=");
                self.space(output);
                self.serialize_expression(init, output);
            }
        }
    }

    fn serialize_binding(&mut self, id: &Identifier, output: &mut String) {
        self.push_token(output, &id.name);

        if let Some(annotation) = &id.type_annotation {
            self.push_token(output, ":");
            self.space(output);
            self.serialize_type(annotation, output);
        }
    }

    fn serialize_function(&mut self, function: &Function, output: &mut String) {
        self.push_token(output, "function");
        if let Some(id) = &function.id {
            self.space(output);
            self.push_token(output, &id.name);
        }

        self.push_token(output, "(");
        for (i, param) in function.params.iter().enumerate() {
            if i > 0 {
                self.push_token(output, ",");
                self.space(output);
            }
            self.serialize_binding(param, output);
        }
        self.push_token(output, ")");

        if let Some(return_type) = &function.return_type {
            self.push_token(output, ":");
            self.space(output);
            self.serialize_type(return_type, output);
        }

        self.space(output);
        self.serialize_block(&function.body, output);
    }

    fn serialize_block(&mut self, body: &[Statement], output: &mut String) {
        if body.is_empty() {
            self.push_token(output, "{}");
            return;
        }

        self.push_token(output, "{");
        self.newline(output);

        self.indent_level += 1;
        for statement in body {
            self.serialize_statement(statement, output);
        }
        self.indent_level -= 1;

        self.write_indent(output);
        self.push_token(output, "}");
    }

    fn serialize_interface(&mut self, interface: &InterfaceDeclaration, output: &mut String) {
        self.push_token(output, "interface");
        self.space(output);
        self.push_token(output, &interface.name);
        self.space(output);

        if interface.body.is_empty() {
            self.push_token(output, "{}");
            return;
        }

        self.push_token(output, "{");
        self.newline(output);

        self.indent_level += 1;
        for member in &interface.body {
            self.write_indent(output);
            self.serialize_property_signature(member, output);
            self.push_token(output, ";");
            self.newline(output);
        }
        self.indent_level -= 1;

        self.write_indent(output);
        self.push_token(output, "}");
    }

    fn serialize_property_signature(&mut self, member: &PropertySignature, output: &mut String) {
        self.push_token(output, &property_key(&member.key));
        self.push_token(output, ":");
        self.space(output);
        self.serialize_type(&member.type_annotation, output);
    }

    fn serialize_type(&mut self, ty: &TsType, output: &mut String) {
        match ty {
            TsType::Any => self.push_token(output, "any"),
            TsType::Number => self.push_token(output, "number"),
            TsType::String => self.push_token(output, "string"),
            TsType::Boolean => self.push_token(output, "boolean"),
            TsType::Null => self.push_token(output, "null"),
            TsType::Void => self.push_token(output, "void"),

            TsType::Reference {
                name,
                type_arguments,
            } => {
                self.push_token(output, name);
                if !type_arguments.is_empty() {
                    self.push_token(output, "<");
                    for (i, argument) in type_arguments.iter().enumerate() {
                        if i > 0 {
                            self.push_token(output, ",");
                            self.space(output);
                        }
                        self.serialize_type(argument, output);
                    }
                    self.push_token(output, ">");
                }
            }

            TsType::Union { types } => {
                for (i, member) in types.iter().enumerate() {
                    if i > 0 {
                        self.space(output);
                        self.push_token(output, "|");
                        self.space(output);
                    }

                    if matches!(member, TsType::Function { .. }) {
                        self.push_token(output, "(");
                        self.serialize_type(member, output);
                        self.push_token(output, ")");
                    } else {
                        self.serialize_type(member, output);
                    }
                }
            }

            TsType::TypeLiteral { members } => {
                if members.is_empty() {
                    self.push_token(output, "{}");
                    return;
                }

                self.push_token(output, "{");
                self.space(output);
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        self.push_token(output, ";");
                        self.space(output);
                    }
                    self.serialize_property_signature(member, output);
                }
                self.space(output);
                self.push_token(output, "}");
            }

            TsType::Function {
                params,
                return_type,
            } => {
                self.push_token(output, "(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.push_token(output, ",");
                        self.space(output);
                    }
                    self.serialize_property_signature(param, output);
                }
                self.push_token(output, ")");
                self.space(output);
                self.push_token(output, "=>");
                self.space(output);
                self.serialize_type(return_type, output);
            }
        }
    }

    fn serialize_expression(&mut self, expr: &Expression, output: &mut String) {
        match expr {
            Expression::Number { raw, .. } => self.push_token(output, raw),

            // Raw spelling keeps the original quotes and escapes
            Expression::String { raw, .. } => self.push_token(output, raw),

            Expression::Boolean { value, .. } => {
                self.push_token(output, if *value { "true" } else { "false" });
            }

            Expression::Null { .. } => self.push_token(output, "null"),

            Expression::Identifier { name, .. } => self.push_token(output, name),

            Expression::Template { parts, .. } => {
                self.push_token(output, "`");
                for part in parts {
                    match part {
                        TemplatePart::Literal(text) => output.push_str(text),
                        TemplatePart::Expression(expr) => {
                            output.push_str("${");
                            self.serialize_expression(expr, output);
                            output.push('}');
                        }
                    }
                }
                output.push('`');
            }

            Expression::Object { properties, .. } => {
                if properties.is_empty() {
                    self.push_token(output, "{}");
                    return;
                }

                self.push_token(output, "{");
                self.space(output);
                for (i, property) in properties.iter().enumerate() {
                    if i > 0 {
                        self.push_token(output, ",");
                        self.space(output);
                    }

                    match &property.key {
                        PropertyKey::Identifier(name) => self.push_token(output, name),
                        PropertyKey::String { raw, .. } | PropertyKey::Number { raw, .. } => {
                            self.push_token(output, raw)
                        }
                    }

                    if !property.shorthand {
                        self.push_token(output, ":");
                        self.space(output);
                        self.serialize_expression(&property.value, output);
                    }
                }
                self.space(output);
                self.push_token(output, "}");
            }

            Expression::Array { elements, .. } => {
                self.push_token(output, "[");
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.push_token(output, ",");
                        if element.is_some() {
                            self.space(output);
                        }
                    }
                    if let Some(element) = element {
                        self.serialize_expression(element, output);
                    }
                }
                // A trailing hole needs its own comma to survive a re-parse
                if matches!(elements.last(), Some(None)) {
                    self.push_token(output, ",");
                }
                self.push_token(output, "]");
            }

            Expression::Binary {
                left,
                operator,
                right,
                ..
            } => {
                self.serialize_expression(left, output);
                self.space(output);
                self.push_token(output, operator.as_str());
                self.space(output);
                self.serialize_expression(right, output);
            }

            Expression::Unary {
                operator, argument, ..
            } => {
                self.push_token(output, operator.as_str());
                if *operator == UnaryOp::Typeof {
                    self.space(output);
                }
                self.serialize_expression(argument, output);
            }

            Expression::Assignment {
                operator,
                target,
                value,
                ..
            } => {
                self.serialize_expression(target, output);
                self.space(output);
                self.push_token(output, operator.as_str());
                self.space(output);
                self.serialize_expression(value, output);
            }

            Expression::Conditional {
                test,
                consequent,
                alternate,
                ..
            } => {
                self.serialize_expression(test, output);
                self.space(output);
                self.push_token(output, "?");
                self.space(output);
                self.serialize_expression(consequent, output);
                self.space(output);
                self.push_token(output, ":");
                self.space(output);
                self.serialize_expression(alternate, output);
            }

            Expression::Member {
                object, property, ..
            } => {
                self.serialize_expression(object, output);
                self.push_token(output, ".");
                self.push_token(output, property);
            }

            Expression::Index { object, index, .. } => {
                self.serialize_expression(object, output);
                self.push_token(output, "[");
                self.serialize_expression(index, output);
                self.push_token(output, "]");
            }

            Expression::Call {
                callee, arguments, ..
            } => {
                self.serialize_expression(callee, output);
                self.push_token(output, "(");
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        self.push_token(output, ",");
                        self.space(output);
                    }
                    self.serialize_expression(argument, output);
                }
                self.push_token(output, ")");
            }

            Expression::Function(function) => {
                self.serialize_function(function, output);
            }

            Expression::Paren { expression, .. } => {
                self.push_token(output, "(");
                self.serialize_expression(expression, output);
                self.push_token(output, ")");
            }
        }
    }

    /// Append a token, inserting a space only where the previous token would
    /// otherwise merge with it (`let x`, `a- -b`)
    fn push_token(&self, output: &mut String, token: &str) {
        if let (Some(last), Some(first)) = (output.chars().last(), token.chars().next()) {
            let merges = (is_identifier_char(last) && is_identifier_char(first))
                || (last == '+' && first == '+')
                || (last == '-' && first == '-');
            if merges {
                output.push(' ');
            }
        }
        output.push_str(token);
    }

    fn space(&self, output: &mut String) {
        if !self.compact {
            output.push(' ');
        }
    }

    fn newline(&self, output: &mut String) {
        if !self.compact {
            output.push('\n');
        }
    }

    fn write_indent(&self, output: &mut String) {
        if self.compact {
            return;
        }
        for _ in 0..self.indent_level {
            output.push_str(&self.indent_string);
        }
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '$'
}

/// Whether `name` can be written as a bare property key
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}

/// Property key for type syntax, double-quoted when not a bare identifier
pub fn property_key(name: &str) -> String {
    if is_identifier_name(name) {
        return name.to_string();
    }

    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            '\u{2028}' => quoted.push_str("\\u2028"),
            '\u{2029}' => quoted.push_str("\\u2029"),
            _ => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Leftmost token of the expression is `{` or `function`
fn starts_ambiguously(expr: &Expression) -> bool {
    match expr {
        Expression::Object { .. } | Expression::Function(_) => true,
        Expression::Binary { left, .. } => starts_ambiguously(left),
        Expression::Assignment { target, .. } => starts_ambiguously(target),
        Expression::Conditional { test, .. } => starts_ambiguously(test),
        Expression::Member { object, .. } | Expression::Index { object, .. } => {
            starts_ambiguously(object)
        }
        Expression::Call { callee, .. } => starts_ambiguously(callee),
        _ => false,
    }
}

/// Convenience function to serialize a program with the default layout
pub fn serialize(program: &Program) -> String {
    let mut serializer = Serializer::new();
    serializer.serialize(program)
}
