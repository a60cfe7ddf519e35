use js2ts_parser::{parse_with_options, ParseOptions};

/// Checks emitted TypeScript before a file is reported as done
pub trait Verifier: Send + Sync {
    /// Diagnostics for `text`; empty means the file passed
    fn verify(&self, file_name: &str, text: &str) -> Vec<String>;
}

/// Re-parses emitted code in the TypeScript dialect
pub struct SyntaxVerifier;

impl Verifier for SyntaxVerifier {
    fn verify(&self, file_name: &str, text: &str) -> Vec<String> {
        match parse_with_options(text, ParseOptions::typescript()) {
            Ok(_) => Vec::new(),
            Err(err) => {
                let (line, column) = line_column(text, err.span().start);
                vec![format!("{}:{}:{}: {}", file_name, line, column, err)]
            }
        }
    }
}

/// 1-based line and column of a byte offset
fn line_column(text: &str, offset: usize) -> (usize, usize) {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count() + 1;
    let column = before
        .rsplit('\n')
        .next()
        .map(|last| last.chars().count())
        .unwrap_or(0)
        + 1;
    (line, column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_annotated_output() {
        let text = "interface Obj {\n  a: number;\n}\nconst obj: Obj = { a: 1 };\n";
        assert!(SyntaxVerifier.verify("obj.ts", text).is_empty());
    }

    #[test]
    fn test_reports_position() {
        let diagnostics = SyntaxVerifier.verify("bad.ts", "let a = 1;\nlet = 2;\n");

        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].starts_with("bad.ts:2:5: "));
    }

    #[test]
    fn test_line_column() {
        assert_eq!(line_column("abc", 0), (1, 1));
        assert_eq!(line_column("ab\ncd", 4), (2, 2));
        assert_eq!(line_column("ab", 10), (1, 3));
    }
}
