use monkey::{
    environment::Environment,
    evaluate, parse,
    scanner::Scanner,
    value::{Value, NULL},
};
use pretty_assertions::assert_eq;

fn eval(src: &str) -> Value {
    let (program, errors) = parse(Scanner::new(src));
    assert!(errors.is_empty(), "unexpected parse errors: {:?}", errors);
    evaluate(&program, &Environment::new().into_shared())
}

fn error(message: &str) -> Value {
    Value::Error(message.to_string())
}

#[test]
fn operator_precedence_shows_in_the_canonical_form() {
    let (program, errors) = parse(Scanner::new("3 + 4 * 5 == 3 * 1 + 4 * 5"));
    assert!(errors.is_empty());
    assert_eq!("((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))", program.to_string());
}

#[test]
fn arithmetic() {
    assert_eq!(Value::Integer(50), eval("(5 + 10 * 2 + 15 / 3) * 2 + -10"));
}

#[test]
fn truthiness() {
    for v in ["1", "0", "-1", "\"\"", "\"text\"", "[]", "{}", "fn() { 1 }", "len", "true"].iter() {
        assert_eq!(Value::Integer(10), eval(&format!("if ({}) {{ 10 }}", v)), "condition: {}", v);
    }
    assert_eq!(NULL, eval("if (false) { 10 }"));
    assert_eq!(NULL, eval("let n = if (false) { 1 }; if (n) { 10 }"));
    assert_eq!(Value::Integer(20), eval("if (1 > 2) { 10 } else { 20 }"));
}

#[test]
fn closures_keep_their_defining_scope() {
    assert_eq!(
        Value::Integer(4),
        eval("let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(2);")
    );
}

#[test]
fn closures_share_one_captured_scope() {
    let src = "
        let make = fn(x) { [fn() { x }, fn(y) { x + y }] };
        let pair = make(10);
        pair[0]() + pair[1](5)";
    assert_eq!(Value::Integer(25), eval(src));
}

#[test]
fn errors_halt_the_program() {
    assert_eq!(error("type mismatch: INTEGER + BOOLEAN"), eval("5 + true; 5;"));
}

#[test]
fn errors_escape_nested_blocks_and_calls() {
    let src = "
        let f = fn(x) { if (x > 0) { if (true) { x + \"oops\" } } };
        let result = f(1);
        result";
    assert_eq!(error("type mismatch: INTEGER + STRING"), eval(src));
}

#[test]
fn array_boundaries() {
    assert_eq!(NULL, eval("[1,2,3][3]"));
    assert_eq!(NULL, eval("[1,2,3][-1]"));
    assert_eq!(error("argument to 'len' not supported, got INTEGER"), eval("len(1)"));
    assert_eq!(error("wrong number of arguments. got=2, want=1"), eval("len(\"one\", \"two\")"));
}

#[test]
fn parser_errors_accumulate() {
    let (_, errors) = parse(Scanner::new("let x = 5; let = 10; let 838383;"));
    assert_eq!(2, errors.len());
    assert!(errors.iter().all(|e| e.contains("IDENTIFIER")), "{:?}", errors);
}

#[test]
fn evaluation_is_never_a_panic() {
    let sources = [
        "-9223372036854775807 - 1 / 0",
        "9223372036854775807 * 9223372036854775807",
        "let x = [1][0][0]",
        "first(1, 2)",
        "push(1, 2)",
        "rest([])",
        "{}[[]]",
        "fn(a, b) { a }(1)",
        "\"a\" * 2",
        "!fn() {}",
    ];
    for src in sources.iter() {
        let (program, _) = parse(Scanner::new(src));
        let _ = evaluate(&program, &Environment::new().into_shared());
    }
}

#[test]
fn environment_is_shared_across_evaluations() {
    let env = Environment::new().into_shared();
    for src in ["let counter = fn(x) { x + 1 };", "let a = counter(1);", "let b = counter(a);"].iter() {
        let (program, _) = parse(Scanner::new(src));
        evaluate(&program, &env);
    }
    assert_eq!(Some(Value::Integer(3)), env.borrow().get("b"));
}

#[test]
fn builtins_over_arrays() {
    assert_eq!(
        "[1, 2, 3, 4]",
        eval("let a = [1, 2, 3]; let b = push(a, 4); len(a) == 3; b").to_string()
    );
    assert_eq!("[2, 3]", eval("rest([1, 2, 3])").to_string());
    assert_eq!(Value::Integer(3), eval("last([1, 2, 3])"));
}
