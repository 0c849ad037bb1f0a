use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("transfer layer error: {0}")]
    Transport(#[from] std::io::Error),
    #[error("serial protocol error: {0}")]
    Serial(#[from] serial::Error),
    #[error("timed out waiting for a response")]
    Timeout,
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("instrument communication error: {0}")]
    Communication(String),
    #[error("response '{0}' has no mapped value")]
    UnmappedResponse(String),
    #[error("instrument is closed")]
    Closed,
    #[error("unknown property '{0}'")]
    UnknownProperty(String),
    #[error("property '{0}' is not readable")]
    NotReadable(&'static str),
    #[error("property '{0}' is not writable")]
    NotWritable(&'static str),
    #[error("invalid resource name: '{0}'")]
    InvalidResource(String),
    #[error("malformed command template '{0}'")]
    Template(String),
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout => true,
            Error::Transport(e) => matches!(
                e.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// A candidate value was rejected before anything reached the transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("value not in allowed set: {value}")]
    NotInSet { value: String },
    #[error("value out of range: {value} not in [{min}, {max}]")]
    OutOfRange { value: f64, min: f64, max: f64 },
    #[error("expected a {expected} value, found {found}")]
    WrongType {
        expected: &'static str,
        found: String,
    },
}

pub fn communication_error<S: ToString>(s: S) -> Error {
    Error::Communication(s.to_string())
}
