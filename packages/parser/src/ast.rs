use serde::{Deserialize, Serialize};

/// Span information for source location tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span for nodes synthesized after parsing (no source location)
    pub fn synthetic() -> Self {
        Self { start: 0, end: 0 }
    }
}

/// Root node of a parsed source file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Statement {
    VariableDeclaration(VariableDeclaration),

    FunctionDeclaration(Function),

    Return(ReturnStatement),

    If {
        test: Expression,
        consequent: Box<Statement>,
        alternate: Option<Box<Statement>>,
        span: Span,
    },

    While {
        test: Expression,
        body: Box<Statement>,
        span: Span,
    },

    Block { body: Vec<Statement>, span: Span },

    Expression { expression: Expression, span: Span },

    /// TypeScript `interface` declaration
    Interface(InterfaceDeclaration),

    Empty { span: Span },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::Var => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub kind: DeclarationKind,
    pub declarations: Vec<VariableDeclarator>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub id: Identifier,
    pub init: Option<Expression>,
    pub span: Span,
}

/// Binding identifier (declarator name or parameter) with an optional
/// type annotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub name: String,
    pub type_annotation: Option<TsType>,
    pub span: Span,
}

impl Identifier {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            type_annotation: None,
            span,
        }
    }
}

/// Function declaration or function expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub id: Option<Identifier>,
    pub params: Vec<Identifier>,
    pub body: Vec<Statement>,
    pub return_type: Option<TsType>,
    pub span: Span,
}

impl Function {
    pub fn name(&self) -> Option<&str> {
        self.id.as_ref().map(|id| id.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub argument: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterfaceDeclaration {
    pub name: String,
    pub body: Vec<PropertySignature>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySignature {
    pub key: String,
    pub type_annotation: TsType,
}

/// Type syntax attached to declarations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TsType {
    Any,
    Number,
    String,
    Boolean,
    Null,
    Void,

    /// Named type, optionally with type arguments (`Obj`, `Array<number>`)
    Reference {
        name: String,
        type_arguments: Vec<TsType>,
    },

    Union { types: Vec<TsType> },

    /// Inline structural type (`{ a: number; b: string }`)
    TypeLiteral { members: Vec<PropertySignature> },

    Function {
        params: Vec<PropertySignature>,
        return_type: Box<TsType>,
    },
}

impl TsType {
    pub fn reference(name: impl Into<String>) -> Self {
        TsType::Reference {
            name: name.into(),
            type_arguments: Vec::new(),
        }
    }

    pub fn array_of(element: TsType) -> Self {
        TsType::Reference {
            name: "Array".to_string(),
            type_arguments: vec![element],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Expression {
    /// Numeric literal; `raw` keeps the source spelling
    Number { value: f64, raw: String, span: Span },

    /// String literal; `raw` keeps the quotes and escapes
    String {
        value: String,
        raw: String,
        span: Span,
    },

    Boolean { value: bool, span: Span },

    Null { span: Span },

    Identifier { name: String, span: Span },

    Template { parts: Vec<TemplatePart>, span: Span },

    Object {
        properties: Vec<Property>,
        span: Span,
    },

    /// Array literal; `None` entries are holes (`[1, , 3]`)
    Array {
        elements: Vec<Option<Expression>>,
        span: Span,
    },

    Binary {
        left: Box<Expression>,
        operator: BinaryOp,
        right: Box<Expression>,
        span: Span,
    },

    Unary {
        operator: UnaryOp,
        argument: Box<Expression>,
        span: Span,
    },

    Assignment {
        operator: AssignOp,
        target: Box<Expression>,
        value: Box<Expression>,
        span: Span,
    },

    Conditional {
        test: Box<Expression>,
        consequent: Box<Expression>,
        alternate: Box<Expression>,
        span: Span,
    },

    /// Member access (obj.prop)
    Member {
        object: Box<Expression>,
        property: String,
        span: Span,
    },

    /// Computed member access (obj[key])
    Index {
        object: Box<Expression>,
        index: Box<Expression>,
        span: Span,
    },

    Call {
        callee: Box<Expression>,
        arguments: Vec<Expression>,
        span: Span,
    },

    Function(Box<Function>),

    Paren {
        expression: Box<Expression>,
        span: Span,
    },
}

impl Expression {
    pub fn span(&self) -> Span {
        match self {
            Expression::Number { span, .. }
            | Expression::String { span, .. }
            | Expression::Boolean { span, .. }
            | Expression::Null { span }
            | Expression::Identifier { span, .. }
            | Expression::Template { span, .. }
            | Expression::Object { span, .. }
            | Expression::Array { span, .. }
            | Expression::Binary { span, .. }
            | Expression::Unary { span, .. }
            | Expression::Assignment { span, .. }
            | Expression::Conditional { span, .. }
            | Expression::Member { span, .. }
            | Expression::Index { span, .. }
            | Expression::Call { span, .. }
            | Expression::Paren { span, .. } => *span,
            Expression::Function(function) => function.span,
        }
    }

    /// Node kind name as reported in analysis facts
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Number { .. } => "NumericLiteral",
            Expression::String { .. } => "StringLiteral",
            Expression::Boolean { .. } => "BooleanLiteral",
            Expression::Null { .. } => "NullLiteral",
            Expression::Identifier { .. } => "Identifier",
            Expression::Template { .. } => "TemplateLiteral",
            Expression::Object { .. } => "ObjectExpression",
            Expression::Array { .. } => "ArrayExpression",
            Expression::Binary { .. } => "BinaryExpression",
            Expression::Unary { .. } => "UnaryExpression",
            Expression::Assignment { .. } => "AssignmentExpression",
            Expression::Conditional { .. } => "ConditionalExpression",
            Expression::Member { .. } | Expression::Index { .. } => "MemberExpression",
            Expression::Call { .. } => "CallExpression",
            Expression::Function(_) => "FunctionExpression",
            Expression::Paren { .. } => "ParenthesizedExpression",
        }
    }

    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(&self) -> &Expression {
        let mut expr = self;
        while let Expression::Paren { expression, .. } = expr {
            expr = expression;
        }
        expr
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expression,
    /// `{ a }` written without a value
    pub shorthand: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyKey {
    Identifier(String),
    /// String key: unescaped value and raw spelling
    String { value: String, raw: String },
    /// Numeric key: the name it has at runtime (`16` for `0x10`) and its
    /// source spelling
    Number { value: String, raw: String },
}

impl PropertyKey {
    /// Key name as it appears in an object shape
    pub fn name(&self) -> &str {
        match self {
            PropertyKey::Identifier(name) => name,
            PropertyKey::String { value, .. } => value,
            PropertyKey::Number { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equals,
    NotEquals,
    StrictEquals,
    StrictNotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
}

impl BinaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::StrictEquals => "===",
            BinaryOp::StrictNotEquals => "!==",
            BinaryOp::LessThan => "<",
            BinaryOp::LessThanOrEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterThanOrEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
    Plus,
    Typeof,
}

impl UnaryOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Typeof => "typeof",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
}

impl AssignOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubtractAssign => "-=",
            AssignOp::MultiplyAssign => "*=",
            AssignOp::DivideAssign => "/=",
        }
    }
}

/// Template literal parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplatePart {
    /// Raw source text between interpolations
    Literal(String),
    Expression(Expression),
}

impl Program {
    pub fn new() -> Self {
        Self {
            body: Vec::new(),
            span: Span::synthetic(),
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}
