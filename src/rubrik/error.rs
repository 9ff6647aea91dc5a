use thiserror::Error;

#[derive(Error, Debug)]
pub enum RubrikError {
    #[error("API request failed: {0} - {1}")]
    Api(reqwest::StatusCode, String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Network/Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Rejected before any request was sent.
    #[error("{0}")]
    Usage(String),

    #[error("The {object_type} object '{name}' was not found on the Rubrik cluster")]
    NotFound { object_type: String, name: String },

    #[error("Multiple {object_type} objects named '{name}' were found on the Rubrik cluster. Unable to return a specific object id")]
    Ambiguous { object_type: String, name: String },

    #[error("Response from {0} is missing '{1}'")]
    MissingField(String, &'static str),

    #[error("The Physical Host '{host}' is not assigned to the '{fileset}' Fileset")]
    FilesetNotAssigned { host: String, fileset: String },
}

impl RubrikError {
    pub(crate) fn usage(msg: impl Into<String>) -> Self {
        RubrikError::Usage(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, RubrikError>;
