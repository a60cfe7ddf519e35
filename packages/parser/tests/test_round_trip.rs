use js2ts_parser::{
    parse, parse_with_options, serialize, ParseError, ParseOptions, Serializer, Statement,
};

const SAMPLE: &str = r#"
// Sample input exercising the supported subset
var count = 0;
let name = "world", greeting;
const user = { id: 1, 'full-name': "Ada", tags: ["a", "b"], nested: { ok: true } };
const items = [1, , "two", null];

function greet(prefix, times) {
  let message = `${prefix} ${name}!`;
  while (count < times) {
    count += 1;
  }
  if (typeof prefix === "string" && !done) {
    return message;
  } else {
    return null;
  }
}

const handler = function (event) {
  return event.target.value || user["full-name"];
};

greet("Hello", count > 1 ? 2 : 3);
"#;

#[test]
fn test_pretty_output_reparses_to_same_tree_shape() {
    let program = parse(SAMPLE).unwrap();
    let output = serialize(&program);
    let reparsed = parse(&output).unwrap();

    assert_eq!(program.body.len(), reparsed.body.len());
    // Serializing is stable once formatting is normalized
    assert_eq!(output, serialize(&reparsed));
}

#[test]
fn test_compact_output_reparses() {
    let program = parse(SAMPLE).unwrap();
    let output = Serializer::compact().serialize(&program);

    assert!(!output.contains('\n'));
    let reparsed = parse(&output).unwrap();
    assert_eq!(Serializer::compact().serialize(&reparsed), output);
}

#[test]
fn test_comments_are_dropped() {
    let program = parse(SAMPLE).unwrap();
    assert!(!serialize(&program).contains("Sample input"));
}

#[test]
fn test_typescript_output_reparses_in_typescript_dialect() {
    let source = r#"
interface User { id: number; name: string }
let users: Array<User> = [];
function find(id: number): User | null { return null; }
"#;
    let options = ParseOptions::typescript();
    let program = parse_with_options(source, options).unwrap();
    let output = Serializer::compact().serialize(&program);

    assert!(parse_with_options(&output, options).is_ok());
    assert!(parse(&output).is_err());
}

#[test]
fn test_statement_kinds() {
    let program = parse(SAMPLE).unwrap();

    let kinds: Vec<&str> = program
        .body
        .iter()
        .map(|statement| match statement {
            Statement::VariableDeclaration(_) => "var",
            Statement::FunctionDeclaration(_) => "function",
            Statement::Expression { .. } => "expression",
            _ => "other",
        })
        .collect();

    assert_eq!(
        kinds,
        vec!["var", "var", "var", "var", "function", "var", "expression"]
    );
}

#[test]
fn test_ast_serializes_to_json() {
    let program = parse("let x = 1;").unwrap();
    let json = serde_json::to_value(&program).unwrap();

    assert_eq!(json["body"][0]["type"], "VariableDeclaration");
    assert_eq!(json["body"][0]["kind"], "let");
    assert_eq!(json["body"][0]["declarations"][0]["init"]["raw"], "1");
}

#[test]
fn test_error_positions() {
    let err = parse("let = 5;").unwrap_err();

    assert_eq!(
        err,
        ParseError::unexpected_token(4..5, "identifier", "'='")
    );
}

#[cfg(feature = "pretty-errors")]
#[test]
fn test_pretty_error_report() {
    let source = "function f( {";
    let err = parse(source).unwrap_err();
    let report = js2ts_parser::format_error(&err, "broken.js", source);

    assert!(report.contains("broken.js"));
}
