use crate::error::{ParseError, ParseResult};
use logos::Logos;
use std::fmt;

/// Token types for the supported JavaScript subset
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Token<'src> {
    // Keywords
    #[token("var")]
    Var,

    #[token("let")]
    Let,

    #[token("const")]
    Const,

    #[token("function")]
    Function,

    #[token("return")]
    Return,

    #[token("if")]
    If,

    #[token("else")]
    Else,

    #[token("while")]
    While,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[token("typeof")]
    Typeof,

    // Identifiers
    #[regex(r"[a-zA-Z_$][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    // String literals (quotes included, the serializer re-emits them verbatim)
    #[regex(r#""([^"\\\n\r]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\\n\r]|\\.)*'", |lex| lex.slice())]
    String(&'src str),

    // Template literals (backticks included)
    #[regex(r"`([^`\\]|\\.)*`", |lex| lex.slice())]
    Template(&'src str),

    // Numbers
    #[regex(r"[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex.slice())]
    Number(&'src str),

    // Symbols
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    LAngle,

    #[token(">")]
    RAngle,

    #[token("<=")]
    LessThanEquals,

    #[token(">=")]
    GreaterThanEquals,

    #[token(":")]
    Colon,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("?")]
    Question,

    #[token("=>")]
    Arrow,

    #[token("=")]
    Equals,

    #[token("+=")]
    PlusEquals,

    #[token("-=")]
    MinusEquals,

    #[token("*=")]
    StarEquals,

    #[token("/=")]
    SlashEquals,

    #[token("==")]
    EqualsEquals,

    #[token("!=")]
    NotEquals,

    #[token("===")]
    StrictEquals,

    #[token("!==")]
    StrictNotEquals,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("&&")]
    And,

    #[token("||")]
    Or,

    #[token("|")]
    Pipe,
}

impl<'src> Token<'src> {
    /// Source text of keyword tokens, used where JavaScript allows reserved
    /// words as names (`obj.return`, `{ if: 1 }`).
    pub fn keyword_text(&self) -> Option<&'static str> {
        match self {
            Token::Var => Some("var"),
            Token::Let => Some("let"),
            Token::Const => Some("const"),
            Token::Function => Some("function"),
            Token::Return => Some("return"),
            Token::If => Some("if"),
            Token::Else => Some("else"),
            Token::While => Some("while"),
            Token::True => Some("true"),
            Token::False => Some("false"),
            Token::Null => Some("null"),
            Token::Typeof => Some("typeof"),
            _ => None,
        }
    }
}

impl<'src> fmt::Display for Token<'src> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(keyword) = self.keyword_text() {
            return write!(f, "keyword '{}'", keyword);
        }

        match self {
            Token::Ident(s) => write!(f, "identifier '{}'", s),
            Token::String(s) => write!(f, "string {}", s),
            Token::Template(s) => write!(f, "template {}", s),
            Token::Number(n) => write!(f, "number {}", n),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::LBracket => write!(f, "'['"),
            Token::RBracket => write!(f, "']'"),
            Token::LAngle => write!(f, "'<'"),
            Token::RAngle => write!(f, "'>'"),
            Token::LessThanEquals => write!(f, "'<='"),
            Token::GreaterThanEquals => write!(f, "'>='"),
            Token::Colon => write!(f, "':'"),
            Token::Semicolon => write!(f, "';'"),
            Token::Comma => write!(f, "','"),
            Token::Dot => write!(f, "'.'"),
            Token::Question => write!(f, "'?'"),
            Token::Arrow => write!(f, "'=>'"),
            Token::Equals => write!(f, "'='"),
            Token::PlusEquals => write!(f, "'+='"),
            Token::MinusEquals => write!(f, "'-='"),
            Token::StarEquals => write!(f, "'*='"),
            Token::SlashEquals => write!(f, "'/='"),
            Token::EqualsEquals => write!(f, "'=='"),
            Token::NotEquals => write!(f, "'!='"),
            Token::StrictEquals => write!(f, "'==='"),
            Token::StrictNotEquals => write!(f, "'!=='"),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::Bang => write!(f, "'!'"),
            Token::And => write!(f, "'&&'"),
            Token::Or => write!(f, "'||'"),
            Token::Pipe => write!(f, "'|'"),
            // Keywords are handled above
            _ => write!(f, "{:?}", self),
        }
    }
}

/// Tokenize a source string, failing on the first character the lexer
/// cannot classify.
pub fn tokenize(source: &str) -> ParseResult<Vec<(Token<'_>, std::ops::Range<usize>)>> {
    let mut tokens = Vec::new();

    for (result, span) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, span)),
            Err(()) => {
                let found = source.get(span.clone()).unwrap_or_default().to_string();
                return Err(ParseError::lexer_error(span, found));
            }
        }
    }

    Ok(tokens)
}
