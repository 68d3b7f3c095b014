use thiserror::Error;

use crate::diagnostic::{Diagnostic, Label, Span};
use crate::interpreter::parser::ParseError;
use crate::lexer::LexError;

/// Exit status for lex and parse errors (sysexits.h EX_DATAERR).
pub const EXIT_DATA_ERROR: u8 = 65;
/// Exit status for runtime errors (sysexits.h EX_SOFTWARE).
pub const EXIT_RUNTIME_ERROR: u8 = 70;

/// Failures raised while evaluating. Natives build them with a dummy span;
/// the evaluator attaches the call site with [`RuntimeError::with_span`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("operands must be numbers")]
    OperandsMustBeNumber { span: Span },

    #[error("division by zero")]
    DivisionByZero { span: Span },

    #[error("undefined variable '{name}'")]
    UndefinedVariable { name: String, span: Span },

    #[error("maximum of {max} arguments allowed for method '{function}'")]
    TooManyArguments { function: String, max: usize, span: Span },

    #[error("minimum of {min} arguments required for method '{function}'")]
    TooFewArguments { function: String, min: usize, span: Span },

    #[error("'{name}' is not callable")]
    NotCallable { name: String, span: Span },

    #[error("invalid argument to '{function}': {message}")]
    InvalidArgument { function: String, message: String, span: Span },

    #[error("maximum recursion depth of {max} exceeded calling '{function}'")]
    RecursionLimit { function: String, max: usize, span: Span },
}

impl RuntimeError {
    pub fn operands_must_be_number(span: Span) -> Self {
        Self::OperandsMustBeNumber { span }
    }

    pub fn division_by_zero(span: Span) -> Self {
        Self::DivisionByZero { span }
    }

    pub fn undefined_variable(name: impl Into<String>) -> Self {
        Self::UndefinedVariable {
            name: name.into(),
            span: Span::dummy(),
        }
    }

    pub fn too_many_arguments(function: impl Into<String>, max: usize) -> Self {
        Self::TooManyArguments {
            function: function.into(),
            max,
            span: Span::dummy(),
        }
    }

    pub fn too_few_arguments(function: impl Into<String>, min: usize) -> Self {
        Self::TooFewArguments {
            function: function.into(),
            min,
            span: Span::dummy(),
        }
    }

    pub fn not_callable(name: impl Into<String>, span: Span) -> Self {
        Self::NotCallable {
            name: name.into(),
            span,
        }
    }

    pub fn invalid_argument(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            function: function.into(),
            message: message.into(),
            span: Span::dummy(),
        }
    }

    pub fn recursion_limit(function: impl Into<String>, max: usize) -> Self {
        Self::RecursionLimit {
            function: function.into(),
            max,
            span: Span::dummy(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Self::OperandsMustBeNumber { span }
            | Self::DivisionByZero { span }
            | Self::UndefinedVariable { span, .. }
            | Self::TooManyArguments { span, .. }
            | Self::TooFewArguments { span, .. }
            | Self::NotCallable { span, .. }
            | Self::InvalidArgument { span, .. }
            | Self::RecursionLimit { span, .. } => *span,
        }
    }

    /// Fills in the span if the error was raised without one.
    pub fn with_span(mut self, at: Span) -> Self {
        let span = match &mut self {
            Self::OperandsMustBeNumber { span }
            | Self::DivisionByZero { span }
            | Self::UndefinedVariable { span, .. }
            | Self::TooManyArguments { span, .. }
            | Self::TooFewArguments { span, .. }
            | Self::NotCallable { span, .. }
            | Self::InvalidArgument { span, .. }
            | Self::RecursionLimit { span, .. } => span,
        };
        if span.is_dummy() {
            *span = at;
        }
        self
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::OperandsMustBeNumber { span } => Diagnostic::error("operands must be numbers")
                .with_code("E0201")
                .with_label(Label::primary(*span, "expected numeric operands")),
            Self::DivisionByZero { span } => Diagnostic::error("division by zero")
                .with_code("E0202")
                .with_label(Label::primary(*span, "division by zero here"))
                .with_note("`0`, `\"\"`, `false` and `nil` all count as zero"),
            Self::UndefinedVariable { name, span } => {
                Diagnostic::error(format!("undefined variable `{}`", name))
                    .with_code("E0203")
                    .with_label(Label::primary(*span, "not found in this scope"))
            }
            Self::TooManyArguments { function, max, span } => {
                Diagnostic::error(format!("too many arguments for `{}`", function))
                    .with_code("E0204")
                    .with_label(Label::primary(*span, format!("accepts at most {} argument(s)", max)))
            }
            Self::TooFewArguments { function, min, span } => {
                Diagnostic::error(format!("too few arguments for `{}`", function))
                    .with_code("E0205")
                    .with_label(Label::primary(*span, format!("requires at least {} argument(s)", min)))
            }
            Self::NotCallable { name, span } => Diagnostic::error(format!("`{}` is not callable", name))
                .with_code("E0206")
                .with_label(Label::primary(*span, "not a function"))
                .with_help("only closures and built-in functions can be called"),
            Self::InvalidArgument {
                function,
                message,
                span,
            } => Diagnostic::error(format!("invalid argument to `{}`", function))
                .with_code("E0207")
                .with_label(Label::primary(*span, message.clone())),
            Self::RecursionLimit { function, max, span } => {
                Diagnostic::error(format!("recursion limit reached in `{}`", function))
                    .with_code("E0208")
                    .with_label(Label::primary(*span, format!("more than {} nested calls", max)))
            }
        }
    }
}

/// Any failure from running a whole program.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Lex(error) => error.to_diagnostic(),
            Error::Parse(error) => error.to_diagnostic(),
            Error::Runtime(error) => error.to_diagnostic(),
        }
    }

    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Lex(_) | Error::Parse(_) => EXIT_DATA_ERROR,
            Error::Runtime(_) => EXIT_RUNTIME_ERROR,
        }
    }
}
