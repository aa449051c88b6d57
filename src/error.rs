//! Error types for stored-procedure calls.

use thiserror::Error;

/// Result type alias for stored-procedure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for stored-procedure call operations.
///
/// Driver implementations surface their own failures through the
/// [`Error::Driver`] variant; the call executor propagates them unchanged
/// after the connection has been closed. Coercion of result columns never
/// produces an error (failed parses degrade to zero/`None` values).
#[derive(Error, Debug)]
pub enum Error {
    /// An output-parameter call was made with an argument type that has no
    /// field in the output role.
    #[error("no output-parameter field declared on {type_name}")]
    MissingOutputField { type_name: &'static str },

    /// A scalar call produced no value (empty result or NULL scalar).
    #[error("procedure {procedure} returned no scalar value")]
    ScalarMissing { procedure: String },

    /// A scalar value was present but could not be read as the requested type.
    #[error("scalar value '{value}' cannot be read as {expected}")]
    ScalarConversion {
        expected: &'static str,
        value: String,
    },

    /// The procedure did not set the declared output parameter.
    #[error("output parameter {name} was not set by the procedure")]
    OutputValueMissing { name: String },

    /// The output parameter was set to a value of the wrong shape.
    #[error("output parameter {name} value '{value}' cannot be read as {expected}")]
    OutputConversion {
        name: String,
        expected: &'static str,
        value: String,
    },

    /// Failure raised by the underlying connection, command or cursor.
    #[error("driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a driver-level failure. Used by driver implementations, never by
    /// the call executor.
    pub fn driver(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Driver(err.into())
    }

    /// Create a scalar conversion error.
    pub fn scalar_conversion(expected: &'static str, value: impl ToString) -> Self {
        Self::ScalarConversion {
            expected,
            value: value.to_string(),
        }
    }

    /// Create an output conversion error.
    pub fn output_conversion(
        name: impl Into<String>,
        expected: &'static str,
        value: impl ToString,
    ) -> Self {
        Self::OutputConversion {
            name: name.into(),
            expected,
            value: value.to_string(),
        }
    }
}
