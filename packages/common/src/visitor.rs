use js2ts_parser::ast::*;

/// Visitor pattern for traversing AST nodes immutably
///
/// This trait provides default implementations that walk the entire tree in
/// source order, visiting a node before its children. Override specific
/// visit_* methods to perform custom actions and call the matching walk_*
/// function to continue into children.
pub trait Visitor: Sized {
    fn visit_program(&mut self, program: &Program) {
        walk_program(self, program);
    }

    fn visit_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }

    fn visit_variable_declaration(&mut self, declaration: &VariableDeclaration) {
        walk_variable_declaration(self, declaration);
    }

    /// Called for function declarations and function expressions
    fn visit_function(&mut self, function: &Function) {
        walk_function(self, function);
    }

    fn visit_return_statement(&mut self, statement: &ReturnStatement) {
        if let Some(argument) = &statement.argument {
            self.visit_expression(argument);
        }
    }

    fn visit_interface(&mut self, _interface: &InterfaceDeclaration) {
        // Leaf node, no children to walk
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }
}

/// Mutable visitor pattern for transforming AST nodes
///
/// Similar to Visitor, but provides mutable access to nodes.
/// Use this when you need to modify the AST during traversal.
pub trait VisitorMut: Sized {
    fn visit_program_mut(&mut self, program: &mut Program) {
        walk_program_mut(self, program);
    }

    fn visit_statement_mut(&mut self, statement: &mut Statement) {
        walk_statement_mut(self, statement);
    }

    fn visit_variable_declaration_mut(&mut self, declaration: &mut VariableDeclaration) {
        walk_variable_declaration_mut(self, declaration);
    }

    fn visit_function_mut(&mut self, function: &mut Function) {
        walk_function_mut(self, function);
    }

    fn visit_return_statement_mut(&mut self, statement: &mut ReturnStatement) {
        if let Some(argument) = &mut statement.argument {
            self.visit_expression_mut(argument);
        }
    }

    fn visit_interface_mut(&mut self, _interface: &mut InterfaceDeclaration) {
        // Leaf node, no children to walk
    }

    fn visit_expression_mut(&mut self, expr: &mut Expression) {
        walk_expression_mut(self, expr);
    }
}

// Default walk implementations for immutable visitor

pub fn walk_program<V: Visitor>(visitor: &mut V, program: &Program) {
    for statement in &program.body {
        visitor.visit_statement(statement);
    }
}

pub fn walk_statement<V: Visitor>(visitor: &mut V, statement: &Statement) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            visitor.visit_variable_declaration(declaration);
        }
        Statement::FunctionDeclaration(function) => {
            visitor.visit_function(function);
        }
        Statement::Return(ret) => {
            visitor.visit_return_statement(ret);
        }
        Statement::If {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression(test);
            visitor.visit_statement(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_statement(alternate);
            }
        }
        Statement::While { test, body, .. } => {
            visitor.visit_expression(test);
            visitor.visit_statement(body);
        }
        Statement::Block { body, .. } => {
            for statement in body {
                visitor.visit_statement(statement);
            }
        }
        Statement::Expression { expression, .. } => {
            visitor.visit_expression(expression);
        }
        Statement::Interface(interface) => {
            visitor.visit_interface(interface);
        }
        Statement::Empty { .. } => {
            // No children to walk
        }
    }
}

pub fn walk_variable_declaration<V: Visitor>(visitor: &mut V, declaration: &VariableDeclaration) {
    for declarator in &declaration.declarations {
        if let Some(init) = &declarator.init {
            visitor.visit_expression(init);
        }
    }
}

pub fn walk_function<V: Visitor>(visitor: &mut V, function: &Function) {
    for statement in &function.body {
        visitor.visit_statement(statement);
    }
}

pub fn walk_expression<V: Visitor>(visitor: &mut V, expr: &Expression) {
    match expr {
        Expression::Number { .. }
        | Expression::String { .. }
        | Expression::Boolean { .. }
        | Expression::Null { .. }
        | Expression::Identifier { .. } => {
            // Leaf nodes
        }
        Expression::Template { parts, .. } => {
            for part in parts {
                if let TemplatePart::Expression(expr) = part {
                    visitor.visit_expression(expr);
                }
            }
        }
        Expression::Object { properties, .. } => {
            for property in properties {
                visitor.visit_expression(&property.value);
            }
        }
        Expression::Array { elements, .. } => {
            for element in elements.iter().flatten() {
                visitor.visit_expression(element);
            }
        }
        Expression::Binary { left, right, .. } => {
            visitor.visit_expression(left);
            visitor.visit_expression(right);
        }
        Expression::Unary { argument, .. } => {
            visitor.visit_expression(argument);
        }
        Expression::Assignment { target, value, .. } => {
            visitor.visit_expression(target);
            visitor.visit_expression(value);
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression(test);
            visitor.visit_expression(consequent);
            visitor.visit_expression(alternate);
        }
        Expression::Member { object, .. } => {
            visitor.visit_expression(object);
        }
        Expression::Index { object, index, .. } => {
            visitor.visit_expression(object);
            visitor.visit_expression(index);
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            visitor.visit_expression(callee);
            for arg in arguments {
                visitor.visit_expression(arg);
            }
        }
        Expression::Function(function) => {
            visitor.visit_function(function);
        }
        Expression::Paren { expression, .. } => {
            visitor.visit_expression(expression);
        }
    }
}

// Default walk implementations for mutable visitor

pub fn walk_program_mut<V: VisitorMut>(visitor: &mut V, program: &mut Program) {
    for statement in &mut program.body {
        visitor.visit_statement_mut(statement);
    }
}

pub fn walk_statement_mut<V: VisitorMut>(visitor: &mut V, statement: &mut Statement) {
    match statement {
        Statement::VariableDeclaration(declaration) => {
            visitor.visit_variable_declaration_mut(declaration);
        }
        Statement::FunctionDeclaration(function) => {
            visitor.visit_function_mut(function);
        }
        Statement::Return(ret) => {
            visitor.visit_return_statement_mut(ret);
        }
        Statement::If {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression_mut(test);
            visitor.visit_statement_mut(consequent);
            if let Some(alternate) = alternate {
                visitor.visit_statement_mut(alternate);
            }
        }
        Statement::While { test, body, .. } => {
            visitor.visit_expression_mut(test);
            visitor.visit_statement_mut(body);
        }
        Statement::Block { body, .. } => {
            for statement in body {
                visitor.visit_statement_mut(statement);
            }
        }
        Statement::Expression { expression, .. } => {
            visitor.visit_expression_mut(expression);
        }
        Statement::Interface(interface) => {
            visitor.visit_interface_mut(interface);
        }
        Statement::Empty { .. } => {
            // No children to walk
        }
    }
}

pub fn walk_variable_declaration_mut<V: VisitorMut>(
    visitor: &mut V,
    declaration: &mut VariableDeclaration,
) {
    for declarator in &mut declaration.declarations {
        if let Some(init) = &mut declarator.init {
            visitor.visit_expression_mut(init);
        }
    }
}

pub fn walk_function_mut<V: VisitorMut>(visitor: &mut V, function: &mut Function) {
    for statement in &mut function.body {
        visitor.visit_statement_mut(statement);
    }
}

pub fn walk_expression_mut<V: VisitorMut>(visitor: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Number { .. }
        | Expression::String { .. }
        | Expression::Boolean { .. }
        | Expression::Null { .. }
        | Expression::Identifier { .. } => {
            // Leaf nodes
        }
        Expression::Template { parts, .. } => {
            for part in parts {
                if let TemplatePart::Expression(expr) = part {
                    visitor.visit_expression_mut(expr);
                }
            }
        }
        Expression::Object { properties, .. } => {
            for property in properties {
                visitor.visit_expression_mut(&mut property.value);
            }
        }
        Expression::Array { elements, .. } => {
            for element in elements.iter_mut().flatten() {
                visitor.visit_expression_mut(element);
            }
        }
        Expression::Binary { left, right, .. } => {
            visitor.visit_expression_mut(left);
            visitor.visit_expression_mut(right);
        }
        Expression::Unary { argument, .. } => {
            visitor.visit_expression_mut(argument);
        }
        Expression::Assignment { target, value, .. } => {
            visitor.visit_expression_mut(target);
            visitor.visit_expression_mut(value);
        }
        Expression::Conditional {
            test,
            consequent,
            alternate,
            ..
        } => {
            visitor.visit_expression_mut(test);
            visitor.visit_expression_mut(consequent);
            visitor.visit_expression_mut(alternate);
        }
        Expression::Member { object, .. } => {
            visitor.visit_expression_mut(object);
        }
        Expression::Index { object, index, .. } => {
            visitor.visit_expression_mut(object);
            visitor.visit_expression_mut(index);
        }
        Expression::Call {
            callee, arguments, ..
        } => {
            visitor.visit_expression_mut(callee);
            for arg in arguments {
                visitor.visit_expression_mut(arg);
            }
        }
        Expression::Function(function) => {
            visitor.visit_function_mut(function);
        }
        Expression::Paren { expression, .. } => {
            visitor.visit_expression_mut(expression);
        }
    }
}
