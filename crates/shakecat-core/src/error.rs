use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    EmptyCatalog,
    BlankMessage { index: usize },
    InvalidTemplate(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::EmptyCatalog => write!(f, "prediction catalog is empty"),
            CoreError::BlankMessage { index } => {
                write!(f, "prediction catalog entry {index} is blank")
            }
            CoreError::InvalidTemplate(msg) => write!(f, "invalid share template: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

pub type Result<T> = std::result::Result<T, CoreError>;
