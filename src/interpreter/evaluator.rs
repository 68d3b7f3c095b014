use crate::ast::{BinaryOp, CallStmt, Expr, ExprKind, FunctionDecl, ListStmt, Stmt, UnaryOp};
use crate::diagnostic::Span;
use crate::format::{render, value_to_string};
use crate::ordered_map::{Key, OrderedMap};
use crate::stack::ensure_sufficient_stack;
use crate::value::{same_native, Closure, Value};
use super::builtins;
use super::control_flow::ControlFlow;
use super::environment::Environment;
use super::error::{RuntimeError, EXIT_RUNTIME_ERROR};
use std::io::{self, Write};
use std::rc::Rc;

/// Where evaluation currently is: the innermost scope and how deeply lists are
/// nested inside the current function body (or the program).
#[derive(Debug, Clone)]
pub struct Context {
    pub env: Rc<Environment>,
    pub depth: usize,
}

impl Context {
    pub fn new(env: Rc<Environment>) -> Self {
        Self { env, depth: 0 }
    }

    /// Context for the items of a list. Only nested lists get their own scope,
    /// so declarations in a top-level list stay visible to later statements.
    fn enter_list(&self) -> Self {
        let depth = self.depth + 1;
        let env = if depth > 1 {
            Rc::new(Environment::with_enclosing(Rc::clone(&self.env)))
        } else {
            Rc::clone(&self.env)
        };
        Self { env, depth }
    }
}

/// Closure calls that may be active at once.
pub const MAX_CALL_DEPTH: usize = 512;

pub struct Interpreter {
    /// Built-in functions, consulted after the lexical chain.
    globals: Rc<Environment>,
    /// Scope shared by the top-level statements of every `interpret` call.
    environment: Rc<Environment>,
    out: Box<dyn Write>,
    call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_output(Box::new(io::stdout()))
    }

    /// An interpreter whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        let globals = Rc::new(Environment::new());
        builtins::register(&globals);
        Self {
            globals,
            environment: Rc::new(Environment::new()),
            out,
            call_depth: 0,
        }
    }

    pub fn environment(&self) -> &Rc<Environment> {
        &self.environment
    }

    pub fn output(&mut self) -> &mut dyn Write {
        self.out.as_mut()
    }

    /// Runs `statements` in order and collects each one's value. A top-level
    /// `>>` stops the program; its value is the last result.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<Vec<Value>, RuntimeError> {
        let ctx = Context::new(Rc::clone(&self.environment));
        let mut results = Vec::with_capacity(statements.len());
        for statement in statements {
            match self.execute(statement, &ctx)? {
                ControlFlow::Value(value) => results.push(value),
                ControlFlow::Return(value) => {
                    tracing::debug!("program returned early");
                    results.push(value);
                    break;
                }
            }
        }
        tracing::debug!(results = results.len(), "interpreted program");
        Ok(results)
    }

    /// Like [`Interpreter::interpret`], but a runtime error is handed to
    /// `report` and the process exits with status 70.
    pub fn interpret_or_exit(&mut self, statements: &[Stmt], report: impl FnOnce(&RuntimeError)) -> Vec<Value> {
        match self.interpret(statements) {
            Ok(results) => results,
            Err(error) => {
                // Whatever the program printed goes out before the report.
                if let Err(flush_error) = self.out.flush() {
                    tracing::warn!(error = %flush_error, "failed to flush program output");
                }
                report(&error);
                std::process::exit(i32::from(EXIT_RUNTIME_ERROR));
            }
        }
    }

    pub fn execute(&mut self, statement: &Stmt, ctx: &Context) -> Result<ControlFlow, RuntimeError> {
        ensure_sufficient_stack(|| self.execute_stmt(statement, ctx))
    }

    fn execute_stmt(&mut self, statement: &Stmt, ctx: &Context) -> Result<ControlFlow, RuntimeError> {
        match statement {
            Stmt::Expression(expr) => Ok(ControlFlow::Value(self.evaluate(expr, ctx)?)),
            Stmt::VariableDecl {
                name, initializer, ..
            } => self.execute_variable_decl(name, initializer.as_deref(), ctx),
            Stmt::List(list) => self.execute_list(list, ctx),
            Stmt::Call(call) => Ok(ControlFlow::Value(self.execute_call(call, Value::Nil, ctx)?)),
            Stmt::FunctionDecl(decl) => Ok(ControlFlow::Value(self.make_closure(decl, ctx, None))),
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(value) => self.execute(value, ctx)?.into_value(),
                    None => Value::Nil,
                };
                Ok(ControlFlow::Return(value))
            }
        }
    }

    /// Binds the declaration. The statement's own value is the initializer's
    /// value, or the `"<closure>"` / `"<variable>"` placeholders.
    fn execute_variable_decl(
        &mut self,
        name: &Rc<str>,
        initializer: Option<&Stmt>,
        ctx: &Context,
    ) -> Result<ControlFlow, RuntimeError> {
        let Some(initializer) = initializer else {
            ctx.env.define(Rc::clone(name), Value::Nil);
            return Ok(ControlFlow::Value(Value::string("<variable>")));
        };

        if let Stmt::FunctionDecl(decl) = initializer {
            let closure = self.make_closure(decl, ctx, Some(Rc::clone(name)));
            ctx.env.define(Rc::clone(name), closure);
            return Ok(ControlFlow::Value(Value::string("<closure>")));
        }

        match self.execute(initializer, ctx)? {
            ControlFlow::Value(value) => {
                ctx.env.define(Rc::clone(name), value.clone());
                Ok(ControlFlow::Value(value))
            }
            flow @ ControlFlow::Return(_) => Ok(flow),
        }
    }

    fn execute_list(&mut self, list: &ListStmt, ctx: &Context) -> Result<ControlFlow, RuntimeError> {
        let scope = ctx.enter_list();
        tracing::trace!(depth = scope.depth, items = list.items.len(), "enter list");

        let mut map = OrderedMap::with_capacity(list.items.len());
        for (index, item) in list.items.iter().enumerate() {
            let value = match self.execute(item, &scope)? {
                ControlFlow::Value(value) => value,
                flow @ ControlFlow::Return(_) => return Ok(flow),
            };
            let key = match item {
                Stmt::VariableDecl { name, .. } => Key::Name(Rc::clone(name)),
                _ => Key::index(index),
            };
            map.set(key, value);
        }

        // Each call in the pipeline receives the previous result as its caller.
        let mut result = Value::list(map);
        for call in &list.pipeline {
            result = self.execute_call(call, result, &scope)?;
        }
        Ok(ControlFlow::Value(result))
    }

    fn execute_call(&mut self, call: &CallStmt, caller: Value, ctx: &Context) -> Result<Value, RuntimeError> {
        let callee = self.evaluate(&call.callee, ctx)?;
        let args = call
            .arguments
            .iter()
            .map(|arg| self.evaluate(arg, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        if !matches!(callee, Value::Native(_) | Value::Closure(_)) {
            let name = match &call.callee.kind {
                ExprKind::Variable(name) => name.to_string(),
                _ => render(&callee),
            };
            return Err(RuntimeError::not_callable(name, call.callee.span));
        }

        self.call_value(&callee, caller, args)
            .map_err(|error| error.with_span(call.span))
    }

    /// Invokes a native or closure. Natives have their arity checked here.
    pub fn call_value(&mut self, callee: &Value, caller: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Native(native) => {
                let arity = native.arity();
                tracing::trace!(function = native.name(), args = args.len(), "call native");
                if args.len() > arity.max {
                    return Err(RuntimeError::too_many_arguments(native.name(), arity.max));
                }
                if args.len() < arity.min {
                    return Err(RuntimeError::too_few_arguments(native.name(), arity.min));
                }
                let native = Rc::clone(native);
                native.call(self, caller, args)
            }
            Value::Closure(closure) => self.call_closure(closure, caller, args),
            other => Err(RuntimeError::not_callable(render(other), Span::dummy())),
        }
    }

    /// Positional arguments are the caller spread out, followed by the explicit
    /// arguments. Parameters bind in a fresh scope under the captured one.
    fn call_closure(&mut self, closure: &Rc<Closure>, caller: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let mut positional = spread(caller);
        positional.extend(args);

        let param_count = closure.decl.params().count();
        tracing::trace!(function = closure.display_name(), args = positional.len(), "call closure");
        if positional.len() > param_count {
            return Err(RuntimeError::too_many_arguments(closure.display_name(), param_count));
        }
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(RuntimeError::recursion_limit(closure.display_name(), MAX_CALL_DEPTH));
        }

        self.call_depth += 1;
        let result = self.run_closure(closure, positional);
        self.call_depth -= 1;
        result
    }

    fn run_closure(&mut self, closure: &Closure, positional: Vec<Value>) -> Result<Value, RuntimeError> {
        let decl = Rc::clone(&closure.decl);

        let ctx = Context::new(Rc::new(Environment::with_enclosing(Rc::clone(&closure.env))));
        let mut positional = positional.into_iter();
        for (name, default) in decl.params() {
            let value = match (positional.next(), default) {
                (Some(value), _) => value,
                (None, Some(default)) => self.execute(default, &ctx)?.into_value(),
                (None, None) => Value::Nil,
            };
            ctx.env.bind(Rc::clone(name), value);
        }

        let mut result = Value::Nil;
        for statement in &decl.body {
            match self.execute(statement, &ctx)? {
                ControlFlow::Return(value) => return Ok(value),
                ControlFlow::Value(value) => result = value,
            }
        }
        Ok(result)
    }

    fn make_closure(&self, decl: &Rc<FunctionDecl>, ctx: &Context, name: Option<Rc<str>>) -> Value {
        Value::Closure(Rc::new(Closure {
            decl: Rc::clone(decl),
            env: Rc::clone(&ctx.env),
            name,
        }))
    }

    pub fn evaluate(&mut self, expr: &Expr, ctx: &Context) -> Result<Value, RuntimeError> {
        ensure_sufficient_stack(|| self.evaluate_expr(expr, ctx))
    }

    fn evaluate_expr(&mut self, expr: &Expr, ctx: &Context) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),
            ExprKind::Grouping(inner) => self.evaluate(inner, ctx),
            ExprKind::Variable(name) => self.lookup(name, ctx, expr.span),
            ExprKind::Unary { op, operand } => {
                let value = self.evaluate(operand, ctx)?;
                match (op, value) {
                    (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
                    (UnaryOp::Neg, Value::Number(number)) => Ok(Value::Number(-number)),
                    (UnaryOp::Neg, _) => Err(RuntimeError::operands_must_be_number(expr.span)),
                }
            }
            ExprKind::Binary { left, op, right } => {
                let left = self.evaluate(left, ctx)?;
                let right = self.evaluate(right, ctx)?;
                eval_binary_op(&left, *op, &right, expr.span)
            }
        }
    }

    /// Lexical chain first, then the built-ins.
    fn lookup(&self, name: &str, ctx: &Context, span: Span) -> Result<Value, RuntimeError> {
        ctx.env
            .lookup(name)
            .or_else(|| self.globals.lookup(name))
            .ok_or_else(|| RuntimeError::undefined_variable(name).with_span(span))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn spread(caller: Value) -> Vec<Value> {
    match caller {
        Value::Nil => Vec::new(),
        Value::List(list) => list.values().cloned().collect(),
        other => vec![other],
    }
}

pub fn eval_binary_op(left: &Value, op: BinaryOp, right: &Value, span: Span) -> Result<Value, RuntimeError> {
    let numbers = || match (left, right) {
        (Value::Number(l), Value::Number(r)) => Ok((*l, *r)),
        _ => Err(RuntimeError::operands_must_be_number(span)),
    };

    match op {
        BinaryOp::Add => match (left, right) {
            (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
            (Value::String(_), _) | (_, Value::String(_)) => {
                let mut combined = value_to_string(left);
                combined.push_str(&value_to_string(right));
                Ok(Value::String(Rc::from(combined)))
            }
            _ => Err(RuntimeError::operands_must_be_number(span)),
        },
        BinaryOp::Sub => numbers().map(|(l, r)| Value::Number(l - r)),
        BinaryOp::Mul => numbers().map(|(l, r)| Value::Number(l * r)),
        BinaryOp::Div => {
            // Zero is checked before operand types.
            if left.is_zero() || right.is_zero() {
                return Err(RuntimeError::division_by_zero(span));
            }
            numbers().map(|(l, r)| Value::Number(l / r))
        }
        BinaryOp::Greater => numbers().map(|(l, r)| Value::Bool(l > r)),
        BinaryOp::GreaterEq => numbers().map(|(l, r)| Value::Bool(l >= r)),
        BinaryOp::Less => numbers().map(|(l, r)| Value::Bool(l < r)),
        BinaryOp::LessEq => numbers().map(|(l, r)| Value::Bool(l <= r)),
        BinaryOp::Eq => Ok(Value::Bool(values_equal(left, right))),
        BinaryOp::NotEq => Ok(Value::Bool(!values_equal(left, right))),
    }
}

/// Numbers compare by value; lists and functions by identity.
pub fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l == r,
        (Value::List(l), Value::List(r)) => Rc::ptr_eq(l, r),
        (Value::Closure(l), Value::Closure(r)) => Rc::ptr_eq(l, r),
        (Value::Native(l), Value::Native(r)) => same_native(l, r),
        _ => left == right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::parser::parse;
    use crate::lexer::tokenize;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn run_capture(source: &str) -> (Result<Vec<Value>, RuntimeError>, String) {
        let buffer = SharedBuffer::default();
        let mut interpreter = Interpreter::with_output(Box::new(buffer.clone()));
        let statements = parse(tokenize(source).expect("Lexer failed")).expect("Parser failed");
        let result = interpreter.interpret(&statements);
        let output = String::from_utf8(buffer.0.borrow().clone()).expect("utf8 output");
        (result, output)
    }

    fn run(source: &str) -> Result<Vec<Value>, RuntimeError> {
        run_capture(source).0
    }

    /// Rendered value of the first item of the last top-level list.
    fn eval(source: &str) -> String {
        let results = run(source).expect("Runtime failed");
        match results.last() {
            Some(Value::List(list)) => list
                .get_index(0)
                .map(|(_, value)| render(value))
                .unwrap_or_default(),
            Some(other) => render(other),
            None => String::new(),
        }
    }

    fn output(source: &str) -> String {
        let (result, output) = run_capture(source);
        result.expect("Runtime failed");
        output
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("(1 + 2 * 3)"), "7");
        assert_eq!(eval("((1 + 2) * 3)"), "9");
        assert_eq!(eval("(10 - 4 - 3)"), "3");
        assert_eq!(eval("(7 / 2)"), "3.5");
        assert_eq!(eval("(-4 * -2)"), "8");
    }

    #[test]
    fn test_comparison() {
        assert_eq!(eval("(3 > 2)"), "true");
        assert_eq!(eval("(3 >= 4)"), "false");
        assert_eq!(eval("(1 < 2)"), "true");
        assert_eq!(eval("(2 <= 2)"), "true");
        assert_eq!(eval("(3 == 3.0)"), "true");
        assert_eq!(eval("(3 != 3)"), "false");
    }

    #[test]
    fn test_equality_across_types() {
        assert_eq!(eval(r#"("a" == "a")"#), "true");
        assert_eq!(eval(r#"(1 == "1")"#), "false");
        assert_eq!(eval("(nil == nil)"), "true");
        assert_eq!(eval("(true != false)"), "true");
    }

    #[test]
    fn test_lists_compare_by_identity() {
        assert_eq!(eval("(a: (1))\n(a == a)"), "true");
        assert_eq!(eval("(a: (1), b: (1))\n(a == b)"), "false");
    }

    #[test]
    fn test_not() {
        assert_eq!(eval("(!nil)"), "true");
        assert_eq!(eval("(!0)"), "false");
        assert_eq!(eval("(!!true)"), "true");
    }

    #[test]
    fn test_string_concatenation() {
        assert_eq!(eval(r#"("hello " + 123)"#), "\"hello 123\"");
        assert_eq!(eval(r#"(123 + "hello")"#), "\"123hello\"");
        assert_eq!(eval(r#"("a" + nil)"#), "\"anil\"");
    }

    #[test]
    fn test_operands_must_be_numbers() {
        assert!(matches!(run("(true - 1)"), Err(RuntimeError::OperandsMustBeNumber { .. })));
        assert!(matches!(run(r#"("a" * 2)"#), Err(RuntimeError::OperandsMustBeNumber { .. })));
        assert!(matches!(run("(-nil)"), Err(RuntimeError::OperandsMustBeNumber { .. })));
        assert!(matches!(run("(true + 1)"), Err(RuntimeError::OperandsMustBeNumber { .. })));
    }

    #[test]
    fn test_division_by_zero_takes_priority() {
        for source in ["(1 / 0)", "(0 / 5)", r#"("x" / 0)"#, r#"("" / 2)"#, "(nil / 3)", "(false / 1)"] {
            assert!(
                matches!(run(source), Err(RuntimeError::DivisionByZero { .. })),
                "{}",
                source
            );
        }
        assert!(matches!(run(r#"("x" / 2)"#), Err(RuntimeError::OperandsMustBeNumber { .. })));
    }

    #[test]
    fn test_undefined_variable() {
        assert_eq!(
            run("(x)").unwrap_err(),
            RuntimeError::UndefinedVariable {
                name: "x".to_string(),
                span: Span::new(1, 2),
            }
        );
    }

    #[test]
    fn test_list_keys() {
        let results = run(r#"(1, two: 2, "three")"#).unwrap();
        let Some(Value::List(list)) = results.first() else {
            panic!("expected a list");
        };
        let keys: Vec<String> = list.keys().map(|key| key.to_string()).collect();
        assert_eq!(keys, vec!["0", "two", "2"]);
    }

    #[test]
    fn test_declaration_placeholders() {
        let results = run("(f: () => { >> 1 }, x:)").unwrap();
        assert_eq!(
            render(&results[0]),
            r#"("<closure>", "<variable>")"#
        );
    }

    #[test]
    fn test_top_level_declarations_are_shared() {
        assert_eq!(eval("(five: 5)\n(ten: 10)\n(five + ten)"), "15");
    }

    #[test]
    fn test_nested_list_scope_is_discarded() {
        assert!(matches!(
            run("((inner: 1))\n(inner)"),
            Err(RuntimeError::UndefinedVariable { .. })
        ));
    }

    #[test]
    fn test_nested_declaration_writes_through() {
        assert_eq!(eval("(x: 1)\n((x: 2))\n(x)"), "2");
    }

    #[test]
    fn test_print() {
        assert_eq!(output("(1, 2, 3).print()"), "(1, 2, 3)\n");
        assert_eq!(output(r#"(hello: "world").print()"#), "(\"world\")\n");
        assert_eq!(
            output(r#"(1, 2, 3, (hello: "world")).print()"#),
            "(1, 2, 3, (\"world\"))\n"
        );
    }

    #[test]
    fn test_pipeline_feeds_previous_result() {
        assert_eq!(output(r#"(1, 2, 3).join(", ").print()"#), "\"1, 2, 3\"\n");
        assert_eq!(eval(r#"(1, 2, 3).join("-")"#), "\"1-2-3\"");
    }

    #[test]
    fn test_join_without_delimiter() {
        assert_eq!(eval(r#"("hello", "world").join()"#), "\"helloworld\"");
    }

    #[test]
    fn test_join_too_many_arguments() {
        assert!(matches!(
            run(r#"(1, 2).join(",", ";")"#),
            Err(RuntimeError::TooManyArguments { ref function, max: 1, .. }) if function == "join"
        ));
    }

    #[test]
    fn test_get() {
        assert_eq!(eval("(1, 2, 3).get(1)"), "2");
        assert_eq!(eval(r#"(one: 1, two: 2).get("one")"#), "1");
        assert_eq!(eval("(1, 2, 3).get(9)"), "nil");
        assert_eq!(eval(r#"(1, 2).get("missing")"#), "nil");
        assert_eq!(eval("(1, 2).get(-1)"), "nil");
    }

    #[test]
    fn test_range() {
        let results = run("range(1, 3)").unwrap();
        assert_eq!(render(&results[0]), "(1, 2, 3)");
        assert_eq!(render(&run("range(5, 1)").unwrap()[0]), "()");
        assert_eq!(output("(a: range(2, 4))\n(a).get(0).print()"), "(2, 3, 4)\n");
    }

    #[test]
    fn test_range_requires_numbers() {
        assert!(matches!(
            run(r#"range("a", 3)"#),
            Err(RuntimeError::InvalidArgument { .. })
        ));
        assert!(matches!(run("range(1)"), Err(RuntimeError::TooFewArguments { min: 2, .. })));
    }

    #[test]
    fn test_closure_via_call() {
        let source = "(five: 5)\n(ten: 10)\n(add: (x, y) => {\n  >> x + y\n})\n(five, ten).call(add)";
        assert_eq!(eval(source), "15");
    }

    #[test]
    fn test_closure_in_pipeline() {
        let source = "(double: (x) => { >> x * 2 })\n(21).double()";
        assert_eq!(eval(source), "42");
    }

    #[test]
    fn test_closure_with_explicit_arguments() {
        let source = "(add: (x, y) => { >> x + y })\nadd(1, 2)";
        assert_eq!(eval(source), "3");
    }

    #[test]
    fn test_closure_defaults() {
        let source = "(greet: (name: \"world\") => { >> \"hello \" + name })\ngreet()";
        assert_eq!(eval(source), "\"hello world\"");
        let source = "(pair: (a, b) => { >> b })\npair(1)";
        assert_eq!(eval(source), "nil");
    }

    #[test]
    fn test_closure_too_many_arguments() {
        let source = "(one: (x) => { >> x })\n(1, 2).one()";
        assert!(matches!(
            run(source),
            Err(RuntimeError::TooManyArguments { ref function, max: 1, .. }) if function == "one"
        ));
    }

    #[test]
    fn test_closure_without_return_yields_last_value() {
        assert_eq!(eval("(f: () => { 1\n 2 })\nf()"), "2");
        assert_eq!(eval("(f: () => { })\nf()"), "nil");
    }

    #[test]
    fn test_first_return_wins() {
        let source = "(f: () => {\n  >> 1\n  >> 2\n})\nf()";
        assert_eq!(eval(source), "1");
    }

    #[test]
    fn test_return_from_nested_list_in_body() {
        let source = "(f: () => {\n  (a: 1, >> a + 1, b: 3)\n})\nf()";
        assert_eq!(eval(source), "2");
    }

    #[test]
    fn test_closure_captures_declaring_scope() {
        let source = "(make: () => {\n  (base: 10)\n  >> (n) => { >> n + base }\n})\n(f: make())\n(5).call(f)";
        assert_eq!(eval(source), "15");
    }

    #[test]
    fn test_parameters_do_not_write_through() {
        let source = "(x: 1)\n(f: (x) => { >> x })\nf(5)\n(x)";
        assert_eq!(eval(source), "1");
    }

    #[test]
    fn test_locals_shadow_builtins() {
        assert_eq!(eval("(print: 5)\n(print + 1)"), "6");
        assert_eq!(output("(1).print()"), "(1)\n");
    }

    #[test]
    fn test_not_callable() {
        assert!(matches!(
            run("(x: 1)\n(1).x()"),
            Err(RuntimeError::NotCallable { ref name, .. }) if name == "x"
        ));
    }

    #[test]
    fn test_top_level_return_stops_program() {
        let (result, output) = run_capture(">> 7\n(1).print()");
        let results = result.unwrap();
        assert_eq!(results, vec![Value::Number(7.0)]);
        assert_eq!(output, "");
    }

    #[test]
    fn test_error_stops_remaining_statements() {
        let (result, output) = run_capture("(1).print()\n(1 / 0)\n(2).print()");
        assert!(result.is_err());
        assert_eq!(output, "(1)\n");
    }

    #[test]
    fn test_deeply_nested_lists_evaluate() {
        let depth = 250;
        let source = format!("{}7{}", "(".repeat(depth), ")".repeat(depth));
        let results = run(&source).unwrap();
        let rendered = render(&results[0]);
        assert!(rendered.starts_with("(((("));
        assert!(rendered.contains('7'));
    }

    #[test]
    fn test_unbounded_recursion_is_an_error() {
        let source = "(forever: () => { >> forever() })\nforever()";
        assert!(matches!(
            run(source),
            Err(RuntimeError::RecursionLimit { ref function, max: MAX_CALL_DEPTH, .. }) if function == "forever"
        ));
    }

    #[test]
    fn test_call_depth_recovers_after_limit() {
        let mut interpreter = Interpreter::with_output(Box::new(io::sink()));
        let define = parse(tokenize("(forever: () => { >> forever() })\n(id: (n) => { >> n })").unwrap()).unwrap();
        interpreter.interpret(&define).unwrap();

        let recurse = parse(tokenize("forever()").unwrap()).unwrap();
        assert!(interpreter.interpret(&recurse).is_err());

        let call = parse(tokenize("id(3)").unwrap()).unwrap();
        assert_eq!(interpreter.interpret(&call).unwrap(), vec![Value::Number(3.0)]);
    }

    #[test]
    fn test_state_persists_between_interpret_calls() {
        let mut interpreter = Interpreter::with_output(Box::new(io::sink()));
        let first = parse(tokenize("(x: 41)").unwrap()).unwrap();
        let second = parse(tokenize("(x + 1)").unwrap()).unwrap();
        interpreter.interpret(&first).unwrap();
        let results = interpreter.interpret(&second).unwrap();
        assert_eq!(render(&results[0]), "(42)");
    }
}
