use thiserror::Error;

/// Standard SCPI error classes, by error-queue code range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScpiError {
    #[error("command error")]
    CommandError,
    #[error("execution error")]
    ExecutionError,
    #[error("device-dependent error")]
    DevDependError,
    #[error("query error")]
    QueryError,
}

impl ScpiError {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -199..=-100 => Some(ScpiError::CommandError),
            -299..=-200 => Some(ScpiError::ExecutionError),
            -399..=-300 => Some(ScpiError::DevDependError),
            -499..=-400 => Some(ScpiError::QueryError),
            _ => None,
        }
    }
}
