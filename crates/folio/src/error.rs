use folio_cms::CmsError;
use folio_config::ConfigError;

/// Failure of a folio command.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Cms(#[from] CmsError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("input is not JSON: {0}")]
    Json(#[from] serde_json::Error),
}
