mod common;

use common::{eval, output, rendered, run_err, SharedBuffer};
use tim::format::render;
use tim::{Error, Interpreter, RuntimeError, Value};

#[test]
fn test_top_level_lists_share_one_scope() {
    assert_eq!(eval("(five: 5)\n(ten: 10)\n(five + ten)"), "15");
}

#[test]
fn test_nested_list_bindings_do_not_escape() {
    assert!(matches!(
        run_err("(outer: (inner: 1))\n(inner)"),
        Error::Runtime(RuntimeError::UndefinedVariable { ref name, .. }) if name == "inner"
    ));
}

#[test]
fn test_nested_list_sees_outer_bindings() {
    assert_eq!(rendered("(a: 1, (a + 1, (a + 2)))"), vec!["(1, (2, (3)))"]);
}

#[test]
fn test_redeclaring_outer_name_writes_through() {
    assert_eq!(eval("(count: 1)\n((count: count + 1))\n(count)"), "2");
}

#[test]
fn test_local_binding_shadows_builtin() {
    assert_eq!(eval("(range: 3)\n(range * 2)"), "6");
}

#[test]
fn test_builtins_are_untouched_by_other_programs() {
    assert_eq!(eval("(r: range(1, 2))\n(r)"), "(1, 2)");
    assert_eq!(output("(get: 1)\n(1, 2).print()"), "(1, 2)\n");
}

#[test]
fn test_declaration_without_initializer() {
    assert_eq!(rendered("(x:, y: 2)\n(x, y)"), vec!["(\"<variable>\", 2)", "(nil, 2)"]);
}

#[test]
fn test_interpreter_keeps_bindings_between_runs() {
    let buffer = SharedBuffer::default();
    let mut interpreter = Interpreter::with_output(Box::new(buffer.clone()));
    tim::run_in(&mut interpreter, "(greeting: \"hi\")").unwrap();
    let results = tim::run_in(&mut interpreter, "(greeting).print()").unwrap();
    assert_eq!(results, vec![Value::Nil]);
    assert_eq!(buffer.contents(), "\"hi\"\n");
    assert!(interpreter.environment().contains("greeting"));
}

#[test]
fn test_top_level_return_ends_program() {
    let results = common::run(">> (1, 2)\n(3).print()");
    assert_eq!(results.iter().map(render).collect::<Vec<_>>(), vec!["(1, 2)"]);
}
