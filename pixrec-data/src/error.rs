use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a call to the image API.
///
/// Errors are logged once by the client and then handed back unchanged;
/// callers decide how to surface them.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("image {0} not found")]
    NotFound(String),

    #[error("failed to parse response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("server rejected the request")]
    Rejected,

    #[error("cannot read upload file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid url {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Short message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => "Could not reach the server. Check your connection.".to_string(),
            Self::Status { status, .. } => format!("The server returned an error (HTTP {status})."),
            Self::NotFound(_) => "Image not found.".to_string(),
            Self::Decode { .. } => "The server sent an unexpected response.".to_string(),
            Self::Rejected => "The server rejected the request.".to_string(),
            Self::Io(_) => "Could not read the selected file.".to_string(),
            Self::InvalidUrl(_) => "The API address is not valid.".to_string(),
        }
    }
}
