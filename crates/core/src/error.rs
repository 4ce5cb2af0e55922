use std::fmt;

#[derive(Debug)]
pub enum AuditError {
    /// A required evidence source is absent or not record-shaped.
    MissingSource { role: String },
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (rate out of range, bad sample size, etc.).
    ConfigValidation(String),
    /// CSV ingestion error.
    Csv(String),
}

impl fmt::Display for AuditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingSource { role } => {
                write!(f, "required source '{role}' is missing or empty")
            }
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}
