use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("capability `{capability}` unavailable: {reason}")]
    Capability {
        capability: &'static str,
        reason: String,
    },

    #[error("surface error: {0}")]
    Surface(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChartError {
    #[must_use]
    pub fn capability(capability: &'static str, reason: impl Into<String>) -> Self {
        Self::Capability {
            capability,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_capability(&self) -> bool {
        matches!(self, Self::Capability { .. })
    }
}
