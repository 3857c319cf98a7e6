//! Error types for table operations

use thiserror::Error;

use crate::parse::Rule;

/// Errors raised while building model components from a table
#[derive(Debug, Error)]
pub enum FrameError {
    /// A column reference did not match any column of the table
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// Joining would create a second column with an existing name
    #[error("column {0} already exists")]
    DuplicateColumn(String),

    /// A column does not have one value per row
    #[error("length mismatch: expected {expected} values, found {found}")]
    LengthMismatch {
        /// number of rows of the table
        expected: usize,
        /// number of values provided
        found: usize,
    },

    /// A series was joined onto a table with a different index
    #[error("index of series {0:?} does not match the table index")]
    IndexMismatch(Option<String>),

    /// Only named series can be joined onto a table
    #[error("cannot join an unnamed series")]
    UnnamedSeries,

    /// A value used as a bound is not a number
    #[error("expected a number, found {0}")]
    NotNumeric(String),

    /// A value cannot take part in a linear expression
    #[error("not a linear expression: {0}")]
    NotLinear(String),

    /// Division of an expression by zero
    #[error("division by zero")]
    DivisionByZero,

    /// A cell that should hold a variable or constraint holds something else
    #[error("expected a variable or constraint handle, found {0}")]
    NotAHandle(String),

    /// A constraint sense other than `<=`, `>=` or `=`
    #[error("unknown constraint sense: {0:?}")]
    UnknownSense(String),

    /// The constraint expression does not follow the comparison grammar
    #[error("malformed constraint expression: {0}")]
    Parse(Box<pest::error::Error<Rule>>),

    /// Error raised by the model, passed through unchanged
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<pest::error::Error<Rule>> for FrameError {
    fn from(e: pest::error::Error<Rule>) -> Self {
        FrameError::Parse(Box::new(e))
    }
}

impl FrameError {
    /// Wrap an error raised by a [crate::model::Model]
    pub fn model<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FrameError::Model(Box::new(e))
    }
}

/// Result type alias for table operations
pub type Result<T> = std::result::Result<T, FrameError>;
