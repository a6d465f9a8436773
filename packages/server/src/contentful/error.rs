use thiserror::Error;

#[derive(Debug, Error)]
pub enum CmsError {
    /// A required credential is absent. Raised at first use, not at startup.
    #[error("Missing CMS configuration: {0}")]
    MissingConfig(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CMS responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed CMS response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A single entry whose fields do not match the expected content type.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("{content_type} entry {id}: {source}")]
    Fields {
        content_type: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{content_type} entry {id}: invalid {field} value '{value}'")]
    InvalidValue {
        content_type: &'static str,
        id: String,
        field: &'static str,
        value: String,
    },
}
