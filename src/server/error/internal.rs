use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// A stored enum column holds a value no variant matches.
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Unknown value '{value}' stored in column {column}")]
    InvalidStoredValue {
        /// Table and column holding the value
        column: &'static str,
        /// The value that failed to parse
        value: String,
    },

    /// A foreign key points at a row that could not be loaded.
    #[error("Row {id} referenced from {column} is missing")]
    DanglingReference {
        /// Table and column holding the reference
        column: &'static str,
        /// Internal id that failed to resolve
        id: i32,
    },
}
