use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Invalid asset pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("Invalid asset selector '{selector}': {message}")]
    InvalidSelector {
        selector: &'static str,
        message: String,
    },
}
