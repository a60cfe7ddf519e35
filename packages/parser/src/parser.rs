use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Source dialect. TypeScript additionally accepts type annotations on
/// declarators, parameters and returns, and `interface` declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    JavaScript,
    TypeScript,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub dialect: Dialect,
}

impl ParseOptions {
    pub fn typescript() -> Self {
        Self {
            dialect: Dialect::TypeScript,
        }
    }
}

/// Deepest syntax tree the parser builds. Later passes recurse over the
/// tree, so this also bounds their stack use.
pub const MAX_NESTING_DEPTH: usize = 256;

// Stack kept free before a nested production runs, and the size of each
// new segment when it does not fit
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

/// Recursive-descent parser over the token stream
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token<'src>, Range<usize>)>,
    pos: usize,
    eof: usize,
    depth: usize,
    options: ParseOptions,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, options: ParseOptions) -> ParseResult<Self> {
        Ok(Self {
            source,
            tokens: tokenize(source)?,
            pos: 0,
            eof: source.len(),
            depth: 0,
            options,
        })
    }

    /// Parse a complete source file
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let mut body = Vec::new();

        while !self.is_at_end() {
            body.push(self.parse_statement()?);
        }

        Ok(Program {
            body,
            span: Span::new(0, self.source.len()),
        })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement> {
        self.nested(Self::parse_statement_kind)
    }

    fn parse_statement_kind(&mut self) -> ParseResult<Statement> {
        match self.peek() {
            Some((Token::Var | Token::Let | Token::Const, _)) => {
                let declaration = self.parse_variable_declaration()?;
                self.consume_semicolon();
                Ok(Statement::VariableDeclaration(declaration))
            }
            Some((Token::Function, _)) => {
                Ok(Statement::FunctionDeclaration(self.parse_function(true)?))
            }
            Some((Token::Return, _)) => self.parse_return(),
            Some((Token::If, _)) => self.parse_if(),
            Some((Token::While, _)) => self.parse_while(),
            Some((Token::LBrace, _)) => self.parse_block(),
            Some((Token::Semicolon, _)) => {
                let range = self.peek_span();
                self.advance();
                Ok(Statement::Empty {
                    span: Span::new(range.start, range.end),
                })
            }
            Some((Token::Ident("interface"), _))
                if self.is_typescript()
                    && matches!(self.peek_ahead(1), Some((Token::Ident(_), _))) =>
            {
                Ok(Statement::Interface(self.parse_interface()?))
            }
            _ => {
                let start = self.start_pos();
                let expression = self.parse_expression()?;
                self.consume_semicolon();
                Ok(Statement::Expression {
                    expression,
                    span: self.span_from(start),
                })
            }
        }
    }

    fn parse_variable_declaration(&mut self) -> ParseResult<VariableDeclaration> {
        let start = self.start_pos();

        let kind = if self.match_token(Token::Var) {
            DeclarationKind::Var
        } else if self.match_token(Token::Let) {
            DeclarationKind::Let
        } else {
            self.expect(Token::Const)?;
            DeclarationKind::Const
        };

        let mut declarations = Vec::new();
        loop {
            let declarator_start = self.start_pos();
            let id = self.parse_binding_identifier()?;
            let init = if self.match_token(Token::Equals) {
                Some(self.parse_assignment_expression()?)
            } else {
                None
            };

            declarations.push(VariableDeclarator {
                id,
                init,
                span: self.span_from(declarator_start),
            });

            if !self.match_token(Token::Comma) {
                break;
            }
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span: self.span_from(start),
        })
    }

    /// Identifier in binding position, with an optional `: type` suffix in
    /// the TypeScript dialect
    fn parse_binding_identifier(&mut self) -> ParseResult<Identifier> {
        let start = self.start_pos();
        let name = self.expect_ident()?;
        let span = self.span_from(start);
        let type_annotation = self.parse_type_annotation()?;

        Ok(Identifier {
            name,
            type_annotation,
            span,
        })
    }

    fn parse_type_annotation(&mut self) -> ParseResult<Option<TsType>> {
        if self.is_typescript() && self.match_token(Token::Colon) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    /// Parse `function name(params) { body }`. The name is optional for
    /// function expressions.
    fn parse_function(&mut self, require_name: bool) -> ParseResult<Function> {
        let start = self.start_pos();
        self.expect(Token::Function)?;

        let id = if matches!(self.peek(), Some((Token::Ident(_), _))) {
            let id_start = self.start_pos();
            let name = self.expect_ident()?;
            Some(Identifier::new(name, self.span_from(id_start)))
        } else if require_name {
            return Err(self.unexpected("function name"));
        } else {
            None
        };

        self.expect(Token::LParen)?;
        let mut params = Vec::new();
        while !self.check(Token::RParen) && !self.is_at_end() {
            params.push(self.parse_binding_identifier()?);

            if !self.match_token(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;

        let return_type = self.parse_type_annotation()?;

        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.expect(Token::RBrace)?;

        Ok(Function {
            id,
            params,
            body,
            return_type,
            span: self.span_from(start),
        })
    }

    fn parse_return(&mut self) -> ParseResult<Statement> {
        let start = self.start_pos();
        self.expect(Token::Return)?;

        // A line break after `return` terminates the statement
        let argument = if self.is_at_end()
            || self.check(Token::Semicolon)
            || self.check(Token::RBrace)
            || self.newline_before_next()
        {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.consume_semicolon();

        Ok(Statement::Return(ReturnStatement {
            argument,
            span: self.span_from(start),
        }))
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        let start = self.start_pos();
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let test = self.parse_expression()?;
        self.expect(Token::RParen)?;

        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.match_token(Token::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        Ok(Statement::If {
            test,
            consequent,
            alternate,
            span: self.span_from(start),
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        let start = self.start_pos();
        self.expect(Token::While)?;
        self.expect(Token::LParen)?;
        let test = self.parse_expression()?;
        self.expect(Token::RParen)?;
        let body = Box::new(self.parse_statement()?);

        Ok(Statement::While {
            test,
            body,
            span: self.span_from(start),
        })
    }

    fn parse_block(&mut self) -> ParseResult<Statement> {
        let start = self.start_pos();
        self.expect(Token::LBrace)?;

        let mut body = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            body.push(self.parse_statement()?);
        }
        self.expect(Token::RBrace)?;

        Ok(Statement::Block {
            body,
            span: self.span_from(start),
        })
    }

    fn parse_interface(&mut self) -> ParseResult<InterfaceDeclaration> {
        let start = self.start_pos();
        self.advance(); // consume 'interface'

        let name = self.expect_ident()?;
        let body = self.parse_type_members()?;

        Ok(InterfaceDeclaration {
            name,
            body,
            span: self.span_from(start),
        })
    }

    // Expressions

    fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.parse_assignment_expression()
    }

    /// Parse assignment (right-associative, lowest precedence)
    fn parse_assignment_expression(&mut self) -> ParseResult<Expression> {
        self.nested(Self::parse_assignment_or_conditional)
    }

    fn parse_assignment_or_conditional(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();
        let target = self.parse_conditional_expression()?;

        let operator = match self.peek() {
            Some((Token::Equals, _)) => AssignOp::Assign,
            Some((Token::PlusEquals, _)) => AssignOp::AddAssign,
            Some((Token::MinusEquals, _)) => AssignOp::SubtractAssign,
            Some((Token::StarEquals, _)) => AssignOp::MultiplyAssign,
            Some((Token::SlashEquals, _)) => AssignOp::DivideAssign,
            _ => return Ok(target),
        };

        if !matches!(
            target.unparenthesized(),
            Expression::Identifier { .. } | Expression::Member { .. } | Expression::Index { .. }
        ) {
            return Err(ParseError::invalid_syntax(
                self.peek_span(),
                "invalid assignment target",
            ));
        }

        self.advance();
        let value = self.parse_assignment_expression()?;

        Ok(Expression::Assignment {
            operator,
            target: Box::new(target),
            value: Box::new(value),
            span: self.span_from(start),
        })
    }

    fn parse_conditional_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();
        let test = self.parse_or_expression()?;

        if !self.match_token(Token::Question) {
            return Ok(test);
        }

        let consequent = self.parse_assignment_expression()?;
        self.expect(Token::Colon)?;
        let alternate = self.parse_assignment_expression()?;

        Ok(Expression::Conditional {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
            span: self.span_from(start),
        })
    }

    fn parse_or_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_chain(Self::parse_and_expression, Self::match_or_op)
    }

    fn parse_and_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_chain(Self::parse_equality_expression, Self::match_and_op)
    }

    fn parse_equality_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_chain(Self::parse_comparison_expression, Self::match_equality_op)
    }

    fn parse_comparison_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_chain(Self::parse_additive_expression, Self::match_comparison_op)
    }

    fn parse_additive_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_chain(Self::parse_multiplicative_expression, Self::match_additive_op)
    }

    fn parse_multiplicative_expression(&mut self) -> ParseResult<Expression> {
        self.parse_binary_chain(Self::parse_unary_expression, Self::match_multiplicative_op)
    }

    /// Left-associative `a op b op c`. Each operator adds a level to the
    /// tree, so each one counts against the nesting limit.
    fn parse_binary_chain(
        &mut self,
        operand: fn(&mut Self) -> ParseResult<Expression>,
        operator: fn(&mut Self) -> Option<BinaryOp>,
    ) -> ParseResult<Expression> {
        let start = self.start_pos();
        let depth = self.depth;
        let mut left = operand(self)?;

        while let Some(op) = operator(self) {
            self.descend()?;
            let right = operand(self)?;
            left = self.binary(left, op, right, start);
        }

        self.depth = depth;
        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();

        let operator = if self.match_token(Token::Bang) {
            Some(UnaryOp::Not)
        } else if self.match_token(Token::Minus) {
            Some(UnaryOp::Negate)
        } else if self.match_token(Token::Plus) {
            Some(UnaryOp::Plus)
        } else if self.match_token(Token::Typeof) {
            Some(UnaryOp::Typeof)
        } else {
            None
        };

        match operator {
            Some(operator) => {
                let argument = self.nested(Self::parse_unary_expression)?;
                Ok(Expression::Unary {
                    operator,
                    argument: Box::new(argument),
                    span: self.span_from(start),
                })
            }
            None => self.parse_postfix_expression(),
        }
    }

    /// Parse member access, index access and calls: `a.b[c](d)`
    fn parse_postfix_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();
        let depth = self.depth;
        let mut expr = self.parse_primary_expression()?;

        loop {
            if self.check(Token::Dot) || self.check(Token::LBracket) || self.check(Token::LParen) {
                self.descend()?;
            }

            if self.match_token(Token::Dot) {
                let property = self.expect_property_name()?;
                expr = Expression::Member {
                    object: Box::new(expr),
                    property,
                    span: self.span_from(start),
                };
            } else if self.match_token(Token::LBracket) {
                let index = self.parse_expression()?;
                self.expect(Token::RBracket)?;
                expr = Expression::Index {
                    object: Box::new(expr),
                    index: Box::new(index),
                    span: self.span_from(start),
                };
            } else if self.match_token(Token::LParen) {
                let mut arguments = Vec::new();
                while !self.check(Token::RParen) && !self.is_at_end() {
                    arguments.push(self.parse_assignment_expression()?);

                    if !self.match_token(Token::Comma) {
                        break;
                    }
                }
                self.expect(Token::RParen)?;

                expr = Expression::Call {
                    callee: Box::new(expr),
                    arguments,
                    span: self.span_from(start),
                };
            } else {
                break;
            }
        }

        self.depth = depth;
        Ok(expr)
    }

    fn parse_primary_expression(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();
        let Some((token, range)) = self.peek().cloned() else {
            return Err(self.unexpected("expression"));
        };
        let token_span = Span::new(range.start, range.end);

        match token {
            Token::Number(raw) => {
                let value = parse_number(raw).ok_or_else(|| {
                    ParseError::invalid_syntax(range.clone(), format!("invalid number '{}'", raw))
                })?;
                self.advance();
                Ok(Expression::Number {
                    value,
                    raw: raw.to_string(),
                    span: token_span,
                })
            }
            Token::String(raw) => {
                self.advance();
                Ok(Expression::String {
                    value: unescape_string(raw),
                    raw: raw.to_string(),
                    span: token_span,
                })
            }
            Token::Template(raw) => {
                self.advance();
                self.parse_template_literal(raw, range)
            }
            Token::True | Token::False => {
                self.advance();
                Ok(Expression::Boolean {
                    value: token == Token::True,
                    span: token_span,
                })
            }
            Token::Null => {
                self.advance();
                Ok(Expression::Null { span: token_span })
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Expression::Identifier {
                    name: name.to_string(),
                    span: token_span,
                })
            }
            Token::LParen => {
                self.advance();
                let expression = self.parse_expression()?;
                self.expect(Token::RParen)?;
                Ok(Expression::Paren {
                    expression: Box::new(expression),
                    span: self.span_from(start),
                })
            }
            Token::LBrace => self.parse_object_literal(),
            Token::LBracket => self.parse_array_literal(),
            Token::Function => Ok(Expression::Function(Box::new(self.parse_function(false)?))),
            _ => Err(self.unexpected("expression")),
        }
    }

    fn parse_object_literal(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();
        self.expect(Token::LBrace)?;

        let mut properties = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            properties.push(self.parse_property()?);

            if !self.match_token(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RBrace)?;

        Ok(Expression::Object {
            properties,
            span: self.span_from(start),
        })
    }

    fn parse_property(&mut self) -> ParseResult<Property> {
        let start = self.start_pos();
        let Some((token, range)) = self.peek().cloned() else {
            return Err(self.unexpected("property name"));
        };

        let key = match &token {
            Token::Ident(name) => PropertyKey::Identifier(name.to_string()),
            Token::String(raw) => PropertyKey::String {
                value: unescape_string(raw),
                raw: raw.to_string(),
            },
            Token::Number(raw) => {
                let value = parse_number(raw).ok_or_else(|| {
                    ParseError::invalid_syntax(range.clone(), format!("invalid number '{}'", raw))
                })?;
                PropertyKey::Number {
                    value: number_to_key(value),
                    raw: raw.to_string(),
                }
            }
            other => match other.keyword_text() {
                Some(keyword) => PropertyKey::Identifier(keyword.to_string()),
                None => return Err(self.unexpected("property name")),
            },
        };
        self.advance();

        // Shorthand `{ a }` reads the binding of the same name
        if matches!(token, Token::Ident(_)) && (self.check(Token::Comma) || self.check(Token::RBrace))
        {
            let value = Expression::Identifier {
                name: key.name().to_string(),
                span: Span::new(range.start, range.end),
            };
            return Ok(Property {
                key,
                value,
                shorthand: true,
                span: self.span_from(start),
            });
        }

        self.expect(Token::Colon)?;
        let value = self.parse_assignment_expression()?;

        Ok(Property {
            key,
            value,
            shorthand: false,
            span: self.span_from(start),
        })
    }

    fn parse_array_literal(&mut self) -> ParseResult<Expression> {
        let start = self.start_pos();
        self.expect(Token::LBracket)?;

        let mut elements = Vec::new();
        while !self.check(Token::RBracket) && !self.is_at_end() {
            if self.match_token(Token::Comma) {
                elements.push(None);
                continue;
            }

            elements.push(Some(self.parse_assignment_expression()?));

            if !self.match_token(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RBracket)?;

        Ok(Expression::Array {
            elements,
            span: self.span_from(start),
        })
    }

    /// Split a template literal into raw text and `${...}` interpolations.
    /// Interpolations are parsed by a sub-parser whose spans are shifted to
    /// their position in the file.
    fn parse_template_literal(
        &mut self,
        raw: &'src str,
        range: Range<usize>,
    ) -> ParseResult<Expression> {
        let content = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
        let content_start = range.start + 1;
        let bytes = content.as_bytes();

        let mut parts = Vec::new();
        let mut literal_start = 0;
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'$' if bytes.get(i + 1) == Some(&b'{') => {
                    if literal_start < i {
                        parts.push(TemplatePart::Literal(content[literal_start..i].to_string()));
                    }

                    let expr_start = i + 2;
                    let expr_end = find_interpolation_end(bytes, expr_start).ok_or_else(|| {
                        ParseError::invalid_syntax(
                            content_start + i..range.end,
                            "unterminated template interpolation",
                        )
                    })?;

                    let expression = self.parse_interpolation(
                        &content[expr_start..expr_end],
                        content_start + expr_start,
                    )?;
                    parts.push(TemplatePart::Expression(expression));

                    i = expr_end + 1;
                    literal_start = i;
                }
                _ => i += 1,
            }
        }

        if literal_start < content.len() {
            parts.push(TemplatePart::Literal(content[literal_start..].to_string()));
        }

        Ok(Expression::Template {
            parts,
            span: Span::new(range.start, range.end),
        })
    }

    fn parse_interpolation(&self, source: &'src str, offset: usize) -> ParseResult<Expression> {
        let tokens = tokenize(source)
            .map_err(|err| err.offset_by(offset))?
            .into_iter()
            .map(|(token, span)| (token, span.start + offset..span.end + offset))
            .collect();

        let mut sub_parser = Parser {
            source: self.source,
            tokens,
            pos: 0,
            eof: offset + source.len(),
            depth: self.depth,
            options: self.options,
        };

        let expression = sub_parser.parse_expression()?;
        if !sub_parser.is_at_end() {
            return Err(sub_parser.unexpected("'}'"));
        }

        Ok(expression)
    }

    // Types (TypeScript dialect)

    fn parse_type(&mut self) -> ParseResult<TsType> {
        self.nested(Self::parse_union_type)
    }

    fn parse_union_type(&mut self) -> ParseResult<TsType> {
        // Leading `|` is allowed
        self.match_token(Token::Pipe);

        let first = self.parse_array_type()?;
        if !self.check(Token::Pipe) {
            return Ok(first);
        }

        let mut types = vec![first];
        while self.match_token(Token::Pipe) {
            types.push(self.parse_array_type()?);
        }

        Ok(TsType::Union { types })
    }

    /// `T[]`, `T[][]`
    fn parse_array_type(&mut self) -> ParseResult<TsType> {
        let depth = self.depth;
        let mut ty = self.parse_primary_type()?;

        while self.check(Token::LBracket) && matches!(self.peek_ahead(1), Some((Token::RBracket, _)))
        {
            self.descend()?;
            self.advance();
            self.advance();
            ty = TsType::array_of(ty);
        }

        self.depth = depth;
        Ok(ty)
    }

    fn parse_primary_type(&mut self) -> ParseResult<TsType> {
        match self.peek().cloned() {
            Some((Token::Ident(name), _)) => {
                self.advance();
                let ty = match name {
                    "any" => TsType::Any,
                    "number" => TsType::Number,
                    "string" => TsType::String,
                    "boolean" => TsType::Boolean,
                    "void" => TsType::Void,
                    _ => {
                        let mut type_arguments = Vec::new();
                        if self.match_token(Token::LAngle) {
                            loop {
                                type_arguments.push(self.parse_type()?);
                                if !self.match_token(Token::Comma) {
                                    break;
                                }
                            }
                            self.expect(Token::RAngle)?;
                        }

                        TsType::Reference {
                            name: name.to_string(),
                            type_arguments,
                        }
                    }
                };
                Ok(ty)
            }
            Some((Token::Null, _)) => {
                self.advance();
                Ok(TsType::Null)
            }
            Some((Token::LBrace, _)) => Ok(TsType::TypeLiteral {
                members: self.parse_type_members()?,
            }),
            Some((Token::LParen, _)) => self.parse_function_or_parenthesized_type(),
            _ => Err(self.unexpected("type")),
        }
    }

    /// `{ key: type; ... }` shared by interfaces and type literals. Members
    /// may be separated by `;` or `,`.
    fn parse_type_members(&mut self) -> ParseResult<Vec<PropertySignature>> {
        self.expect(Token::LBrace)?;

        let mut members = Vec::new();
        while !self.check(Token::RBrace) && !self.is_at_end() {
            let key = match self.peek() {
                Some((Token::String(raw), _)) => {
                    let key = unescape_string(raw);
                    self.advance();
                    key
                }
                _ => self.expect_property_name()?,
            };
            self.expect(Token::Colon)?;
            let type_annotation = self.parse_type()?;
            members.push(PropertySignature {
                key,
                type_annotation,
            });

            if !self.match_token(Token::Semicolon) && !self.match_token(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RBrace)?;

        Ok(members)
    }

    fn parse_function_or_parenthesized_type(&mut self) -> ParseResult<TsType> {
        self.expect(Token::LParen)?;

        let is_function = self.check(Token::RParen)
            || (matches!(self.peek(), Some((Token::Ident(_), _)))
                && matches!(self.peek_ahead(1), Some((Token::Colon, _))));

        if !is_function {
            let inner = self.parse_type()?;
            self.expect(Token::RParen)?;
            return Ok(inner);
        }

        let mut params = Vec::new();
        while !self.check(Token::RParen) && !self.is_at_end() {
            let key = self.expect_ident()?;
            self.expect(Token::Colon)?;
            let type_annotation = self.parse_type()?;
            params.push(PropertySignature {
                key,
                type_annotation,
            });

            if !self.match_token(Token::Comma) {
                break;
            }
        }
        self.expect(Token::RParen)?;
        self.expect(Token::Arrow)?;
        let return_type = Box::new(self.parse_type()?);

        Ok(TsType::Function {
            params,
            return_type,
        })
    }

    // Helper methods for matching operators

    fn match_or_op(&mut self) -> Option<BinaryOp> {
        self.match_token(Token::Or).then_some(BinaryOp::Or)
    }

    fn match_and_op(&mut self) -> Option<BinaryOp> {
        self.match_token(Token::And).then_some(BinaryOp::And)
    }

    fn match_equality_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::StrictEquals) {
            Some(BinaryOp::StrictEquals)
        } else if self.match_token(Token::StrictNotEquals) {
            Some(BinaryOp::StrictNotEquals)
        } else if self.match_token(Token::EqualsEquals) {
            Some(BinaryOp::Equals)
        } else if self.match_token(Token::NotEquals) {
            Some(BinaryOp::NotEquals)
        } else {
            None
        }
    }

    fn match_comparison_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::LessThanEquals) {
            Some(BinaryOp::LessThanOrEqual)
        } else if self.match_token(Token::GreaterThanEquals) {
            Some(BinaryOp::GreaterThanOrEqual)
        } else if self.match_token(Token::LAngle) {
            Some(BinaryOp::LessThan)
        } else if self.match_token(Token::RAngle) {
            Some(BinaryOp::GreaterThan)
        } else {
            None
        }
    }

    fn match_additive_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::Plus) {
            Some(BinaryOp::Add)
        } else if self.match_token(Token::Minus) {
            Some(BinaryOp::Subtract)
        } else {
            None
        }
    }

    fn match_multiplicative_op(&mut self) -> Option<BinaryOp> {
        if self.match_token(Token::Star) {
            Some(BinaryOp::Multiply)
        } else if self.match_token(Token::Slash) {
            Some(BinaryOp::Divide)
        } else if self.match_token(Token::Percent) {
            Some(BinaryOp::Modulo)
        } else {
            None
        }
    }

    fn binary(
        &self,
        left: Expression,
        operator: BinaryOp,
        right: Expression,
        start: usize,
    ) -> Expression {
        Expression::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
            span: self.span_from(start),
        }
    }

    // Helper methods

    /// Run a production one level deeper, growing the stack when needed
    fn nested<T>(&mut self, parse: fn(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        self.descend()?;
        let result = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || parse(self));
        self.depth -= 1;
        result
    }

    fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::invalid_syntax(
                self.peek_span(),
                "nesting too deep",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn peek(&self) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos)
    }

    fn peek_ahead(&self, offset: usize) -> Option<&(Token<'src>, Range<usize>)> {
        self.tokens.get(self.pos + offset)
    }

    fn advance(&mut self) -> Option<&(Token<'src>, Range<usize>)> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn is_typescript(&self) -> bool {
        self.options.dialect == Dialect::TypeScript
    }

    fn check(&self, token: Token) -> bool {
        if let Some((t, _)) = self.peek() {
            std::mem::discriminant(t) == std::mem::discriminant(&token)
        } else {
            false
        }
    }

    fn match_token(&mut self, token: Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: Token) -> ParseResult<()> {
        if self.check(token.clone()) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&token.to_string()))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<String> {
        match self.peek() {
            Some((Token::Ident(s), _)) => {
                let val = s.to_string();
                self.advance();
                Ok(val)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Property names may be reserved words (`obj.return`)
    fn expect_property_name(&mut self) -> ParseResult<String> {
        let name = match self.peek() {
            Some((Token::Ident(s), _)) => s.to_string(),
            Some((token, _)) => match token.keyword_text() {
                Some(keyword) => keyword.to_string(),
                None => return Err(self.unexpected("property name")),
            },
            None => return Err(self.unexpected("property name")),
        };
        self.advance();
        Ok(name)
    }

    fn consume_semicolon(&mut self) {
        self.match_token(Token::Semicolon);
    }

    fn newline_before_next(&self) -> bool {
        let next = self.peek_span().start;
        self.source
            .get(self.previous_end()..next)
            .map_or(false, |gap| gap.contains('\n'))
    }

    /// Start of the next token
    fn start_pos(&self) -> usize {
        self.peek_span().start
    }

    /// End of the last consumed token
    fn previous_end(&self) -> usize {
        if self.pos == 0 {
            return self.peek_span().start;
        }
        self.tokens
            .get(self.pos - 1)
            .map(|(_, span)| span.end)
            .unwrap_or(self.eof)
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous_end())
    }

    /// Get the span of the next token (the one we're about to consume)
    fn peek_span(&self) -> Range<usize> {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.clone())
            .unwrap_or(self.eof..self.eof)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Some((token, span)) => {
                ParseError::unexpected_token(span.clone(), expected, token.to_string())
            }
            None => ParseError::unexpected_eof(self.eof, expected),
        }
    }
}

/// Index of the `}` closing an interpolation that starts at `start`
fn find_interpolation_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 1;

    for (offset, byte) in bytes.get(start..)?.iter().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}

fn parse_number(raw: &str) -> Option<f64> {
    if let Some(hex) = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|value| value as f64);
    }
    raw.parse::<f64>().ok()
}

/// JavaScript's number-to-string conversion, which names a numeric key at
/// runtime: `0x10` is `16`, `1.50` is `1.5`, `1e21` is `1e+21`.
pub fn number_to_key(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return "Infinity".to_string();
    }

    // Shortest round-trip digits and exponent, e.g. `1.5e0`
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    let n = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= n && n <= 21 {
        format!("{}{}", digits, "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (integer, fraction) = digits.split_at(n as usize);
        format!("{}.{}", integer, fraction)
    } else if -6 < n && n <= 0 {
        format!("0.{}{}", "0".repeat((-n) as usize), digits)
    } else {
        let sign = if n > 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        let exponent = (n - 1).abs();
        if rest.is_empty() {
            format!("{}e{}{}", first, sign, exponent)
        } else {
            format!("{}.{}e{}{}", first, rest, sign, exponent)
        }
    }
}

/// Strip the quotes from a string token and resolve escape sequences
fn unescape_string(raw: &str) -> String {
    let content = raw.get(1..raw.len().saturating_sub(1)).unwrap_or_default();
    let mut value = String::with_capacity(content.len());
    let mut chars = content.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            value.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => value.push('\n'),
            Some('t') => value.push('\t'),
            Some('r') => value.push('\r'),
            Some('0') => value.push('\0'),
            Some('x') => value.push(read_hex_escape(&mut chars, 2).unwrap_or('x')),
            Some('u') => value.push(read_unicode_escape(&mut chars).unwrap_or('u')),
            Some(other) => value.push(other),
            None => value.push('\\'),
        }
    }

    value
}

/// `XX` or `XXXX` after `\x` and `\u`. Leaves `chars` untouched on failure.
fn read_hex_escape(chars: &mut std::str::Chars, len: usize) -> Option<char> {
    let rest = chars.as_str();
    let code = u32::from_str_radix(rest.get(..len)?, 16).ok()?;
    let decoded = char::from_u32(code)?;
    *chars = rest[len..].chars();
    Some(decoded)
}

/// `XXXX` or `{X...}` after `\u`
fn read_unicode_escape(chars: &mut std::str::Chars) -> Option<char> {
    let rest = chars.as_str();
    let Some(braced) = rest.strip_prefix('{') else {
        return read_hex_escape(chars, 4);
    };

    let end = braced.find('}')?;
    let code = u32::from_str_radix(&braced[..end], 16).ok()?;
    let decoded = char::from_u32(code)?;
    *chars = braced[end + 1..].chars();
    Some(decoded)
}

pub fn parse(source: &str) -> ParseResult<Program> {
    parse_with_options(source, ParseOptions::default())
}

pub fn parse_with_options(source: &str, options: ParseOptions) -> ParseResult<Program> {
    let mut parser = Parser::new(source, options)?;
    parser.parse_program()
}
