use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse theme config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid protocol in whitelist: {0:?}")]
    InvalidProtocol(String),
    #[error("tooltip size must be positive, got {width}x{height}")]
    InvalidTooltipSize { width: f32, height: f32 },
}

#[derive(Debug, Error)]
pub enum ToolbarDescriptorError {
    #[error("failed to parse toolbar description: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unsupported toolbar item: {0}")]
    Item(String),
}
