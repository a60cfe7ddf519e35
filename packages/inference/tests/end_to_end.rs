use js2ts_inference::{
    analyze, annotate, InferenceEngine, InferenceOptions, TypeDescriptor,
};
use js2ts_parser::{parse, parse_with_options, serialize, ParseOptions, Program, Serializer};

const SCENARIO: &str =
    "let x = 42; const obj = {a: 1, b: 'test'}; function add(a, b) { return a + b; } const arr = [1, 'two', true];";

fn transpile(source: &str, options: &InferenceOptions) -> Program {
    let program = parse(source).unwrap();
    let mut engine = InferenceEngine::new(options.clone());
    let record = analyze(&program, &mut engine);
    annotate(program, &record, options).unwrap()
}

#[test]
fn test_scenario_compact_output() {
    let program = transpile(SCENARIO, &InferenceOptions::default());

    assert_eq!(
        Serializer::compact().serialize(&program),
        "interface Obj{a:number;b:string;}let x:number=42;const obj:Obj={a:1,b:'test'};function add(a:number,b:number):number{return a+b;}const arr:Array<number|string|boolean>=[1,'two',true];"
    );
}

#[test]
fn test_scenario_record() {
    let program = parse(SCENARIO).unwrap();
    let record = analyze(&program, &mut InferenceEngine::default());

    let annotations: Vec<(&str, String)> = record
        .type_annotations
        .iter()
        .map(|(name, ty)| (name.as_str(), ty.render()))
        .collect();
    assert_eq!(
        annotations,
        vec![
            ("x", "number".to_string()),
            ("obj", "Obj".to_string()),
            ("a", "number".to_string()),
            ("b", "number".to_string()),
            ("add_return", "number".to_string()),
            ("arr", "Array<number | string | boolean>".to_string()),
        ]
    );
    assert_eq!(record.interfaces["Obj"].len(), 2);
    assert_eq!(record.return_statements.len(), 1);
    assert_eq!(record.object_literals.len(), 1);
    assert_eq!(record.array_literals.len(), 1);
}

#[test]
fn test_scenario_pretty_output_reparses_as_typescript() {
    let program = transpile(SCENARIO, &InferenceOptions::default());
    let pretty = serialize(&program);

    let reparsed = parse_with_options(&pretty, ParseOptions::typescript()).unwrap();
    assert_eq!(serialize(&reparsed), pretty);
    assert!(pretty.starts_with("interface Obj {\n  a: number;\n  b: string;\n}\n"));
}

#[test]
fn test_empty_array_is_array_of_any() {
    let program = transpile("const items = [];", &InferenceOptions::default());
    assert_eq!(
        Serializer::compact().serialize(&program),
        "const items:Array<any>=[];"
    );
}

#[test]
fn test_function_without_return() {
    let source = "function noop(a) { a(); }";

    let record = analyze(&parse(source).unwrap(), &mut InferenceEngine::default());
    assert_eq!(record.type_annotations["noop_return"], TypeDescriptor::void());

    let full = transpile(source, &InferenceOptions::default());
    assert_eq!(
        Serializer::compact().serialize(&full),
        "function noop(a:any):void{a();}"
    );

    let narrow = transpile(source, &InferenceOptions::narrow());
    assert_eq!(
        Serializer::compact().serialize(&narrow),
        "function noop(a:any):any{a();}"
    );
}

#[test]
fn test_nested_and_mixed_program_reparses() {
    let source = r#"
        var config = { name: "app", retries: 3, tags: ['a', null], nested: { on: true } };
        let counter = 0, label;
        function total(items, start) {
            let sum = start;
            while (sum < 10) { sum += 1; }
            if (items) { return sum + 1; } else { return; }
        }
        const handler = function (event) { return `got ${event}`; };
        const holes = [1, , 'x', ,];
    "#;

    let program = transpile(source, &InferenceOptions::default());
    for output in [serialize(&program), Serializer::compact().serialize(&program)] {
        assert!(
            parse_with_options(&output, ParseOptions::typescript()).is_ok(),
            "output did not reparse:\n{}",
            output
        );
    }
}

#[test]
fn test_output_is_deterministic() {
    let expected = Serializer::compact().serialize(&transpile(SCENARIO, &InferenceOptions::default()));

    for _ in 0..10 {
        let cached = transpile(SCENARIO, &InferenceOptions::default());
        let uncached = transpile(SCENARIO, &InferenceOptions::uncached());
        assert_eq!(Serializer::compact().serialize(&cached), expected);
        assert_eq!(Serializer::compact().serialize(&uncached), expected);
    }
}

#[test]
fn test_analysis_is_idempotent() {
    let program = parse(SCENARIO).unwrap();
    let mut engine = InferenceEngine::default();

    let first = analyze(&program, &mut engine);
    let second = analyze(&program, &mut engine);
    assert_eq!(first, second);
    assert!(engine.cache().stats().hits > 0);
}

#[test]
fn test_numeric_keys_use_runtime_names() {
    let program = transpile("const o = { 0x10: 1, 1.50: 'a' };", &InferenceOptions::default());
    let output = Serializer::compact().serialize(&program);

    assert_eq!(
        output,
        r#"interface O{"16":number;"1.5":string;}const o:O={0x10:1,1.50:'a'};"#
    );
    assert!(parse_with_options(&output, ParseOptions::typescript()).is_ok());
}

#[test]
fn test_escaped_line_terminator_in_key() {
    let program = transpile(r"const o = { 'a\rb': 1 };", &InferenceOptions::default());
    let output = Serializer::compact().serialize(&program);

    assert_eq!(output, r#"interface O{"a\rb":number;}const o:O={'a\rb':1};"#);
    assert!(!output.contains('\r'));
    assert!(parse_with_options(&output, ParseOptions::typescript()).is_ok());
}
