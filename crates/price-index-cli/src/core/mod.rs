use thiserror::Error;

pub mod configuration;

#[derive(Error, Debug)]
pub enum Error {
    #[error("CLI execution error: {0}")]
    Execution(String),
    #[error("CLI validation error: {0}")]
    Validation(String),
    #[error("CLI configuration error: {0}")]
    Configuration(String),
}

impl From<price_index_oracle::Error> for Error {
    fn from(value: price_index_oracle::Error) -> Self {
        match value {
            price_index_oracle::Error::Configuration(e) => Self::Configuration(e),
            e => Self::Execution(e.to_string()),
        }
    }
}
