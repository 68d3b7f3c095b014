pub mod builtins;
pub mod control_flow;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod parser;

pub use control_flow::ControlFlow;
pub use environment::Environment;
pub use error::{Error, RuntimeError};
pub use evaluator::{Context, Interpreter};
pub use parser::{parse, ParseError, Parser};
