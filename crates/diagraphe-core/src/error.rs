pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(
        "content area must be non-negative (width: {width}, height: {height}); margins exceed the display size"
    )]
    NegativeContentArea { width: f64, height: f64 },

    #[error("Unknown element nature: {nature} (element #{index})")]
    UnknownElementKind { index: usize, nature: String },

    #[error("Invalid element #{index} ({nature}): {message}")]
    InvalidElement {
        index: usize,
        nature: String,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Degenerate {axis} bounds: max ({max}) must be greater than min ({min})")]
    DegenerateBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },

    #[error("Invalid curve sampling: {message}")]
    InvalidSampling { message: String },

    #[error("Invalid expression `{source_text}`: {message}")]
    Expression {
        source_text: String,
        message: String,
    },

    #[error("Configuration JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration JSON5 error: {0}")]
    Json5(#[from] json5::Error),
}

impl Error {
    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_sampling(message: impl Into<String>) -> Self {
        Self::InvalidSampling {
            message: message.into(),
        }
    }

    /// Attaches the element position and kind to a field-level error.
    pub fn in_element(self, index: usize, nature: &str) -> Self {
        match self {
            Self::InvalidElement { .. } | Self::UnknownElementKind { .. } => self,
            other => Self::InvalidElement {
                index,
                nature: nature.to_string(),
                message: other.to_string(),
            },
        }
    }
}
