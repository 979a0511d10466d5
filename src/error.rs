use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckError>;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    #[error("Invalid value for operator {operator}: {message}")]
    InvalidValue { operator: String, message: String },

    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Unsupported condition type: {0}")]
    UnsupportedCondition(String),

    #[error("Operator {0} requires an attribute path")]
    MissingAttribute(String),

    #[error("Failed to load check from {path}: {message}")]
    CheckLoad { path: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CheckError {
    pub fn exit_code(&self) -> i32 {
        2
    }

    /// Whether this error is raised while compiling a single rule.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownOperator(_)
                | Self::InvalidValue { .. }
                | Self::InvalidPattern { .. }
                | Self::UnsupportedCondition(_)
                | Self::MissingAttribute(_)
        )
    }
}
