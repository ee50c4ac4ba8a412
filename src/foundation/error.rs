/// Convenience result type used across webpbin.
pub type WebpBinResult<T> = Result<T, WebpBinError>;

/// Top-level error taxonomy returned by the tool builders.
#[derive(thiserror::Error, Debug)]
pub enum WebpBinError {
    /// No usable input or output was configured. Raised before any process is spawned.
    #[error("configuration error: {0}")]
    Config(String),

    /// Turning a decoded GIF back into bytes failed.
    #[error("serialization error: {0}")]
    Serialize(String),

    /// The external tool failed to spawn or exited unsuccessfully.
    ///
    /// The message carries the invoker's own text followed by the tool's stderr.
    #[error("execution error: {0}")]
    Execution(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WebpBinError {
    /// Build a [`WebpBinError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`WebpBinError::Serialize`] value.
    pub fn serialize(msg: impl Into<String>) -> Self {
        Self::Serialize(msg.into())
    }

    /// Build a [`WebpBinError::Execution`] value.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// `true` for the "nothing configured" family of errors.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
