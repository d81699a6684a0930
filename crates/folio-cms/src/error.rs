//! Content retrieval errors.

use folio_config::ConfigError;

/// Error fetching or reading CMS content.
#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    /// Transport failure: connection, TLS or timeout.
    #[error("request to CMS failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// The API answered with status 400 or above.
    #[error("CMS returned {status}: {body}")]
    HttpResponse { status: u16, body: String },

    #[error("malformed CMS response: {0}")]
    Json(#[from] serde_json::Error),

    /// Client settings are incomplete.
    #[error("cannot create CMS client: {0}")]
    Config(#[from] ConfigError),

    /// Entry lacks fields a consumer requires.
    #[error("entry {entry_id} missing fields: {}", .fields.join(", "))]
    MissingFields {
        entry_id: String,
        /// Blank or absent field names, in request order.
        fields: Vec<String>,
    },
}
