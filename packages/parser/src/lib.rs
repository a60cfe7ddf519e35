pub mod ast;
pub mod error;
pub mod parser;
pub mod serializer;
pub mod tokenizer;

pub use ast::*;
pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_with_options, Dialect, ParseOptions, Parser};
pub use serializer::{serialize, Serializer};
pub use tokenizer::{tokenize, Token};

#[cfg(feature = "pretty-errors")]
pub use error::pretty::format_error;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let tokens = tokenize("let x = 1;").unwrap();
        assert_eq!(tokens.len(), 5);
    }
}
