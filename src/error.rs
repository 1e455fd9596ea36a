use thiserror::Error;

use crate::client::ApiError;
use crate::config::ConfigError;
use crate::document::DocumentError;
use crate::plot::PlotError;

#[derive(Debug, Error)]
pub enum EcgError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Plot(#[from] PlotError),
    #[error("invalid listen address: {0}")]
    Address(String),
}
