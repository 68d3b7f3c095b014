#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use tim::format::render;
use tim::{Error, Value};

/// Cloneable sink so tests can read back what `print` wrote.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("utf8 output")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn run_capture(source: &str) -> (Result<Vec<Value>, Error>, String) {
    let buffer = SharedBuffer::default();
    let result = tim::run_with_output(source, buffer.clone());
    (result, buffer.contents())
}

pub fn run(source: &str) -> Vec<Value> {
    run_capture(source).0.expect("program failed")
}

pub fn run_err(source: &str) -> Error {
    match run_capture(source).0 {
        Ok(results) => panic!("expected an error, got {:?}", results),
        Err(error) => error,
    }
}

/// Everything `print` wrote while running `source`.
pub fn output(source: &str) -> String {
    let (result, output) = run_capture(source);
    result.expect("program failed");
    output
}

/// Each top-level result, rendered.
pub fn rendered(source: &str) -> Vec<String> {
    run(source).iter().map(render).collect()
}

/// Rendered first item of the last top-level result.
pub fn eval(source: &str) -> String {
    match run(source).last() {
        Some(Value::List(list)) => list
            .get_index(0)
            .map(|(_, value)| render(value))
            .unwrap_or_default(),
        Some(other) => render(other),
        None => String::new(),
    }
}
