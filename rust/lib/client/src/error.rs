/// Client-side error.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Required input missing; raised before any network call.
    #[error("{0}")]
    Validation(String),

    #[error("invalid username or password")]
    InvalidCredentials,

    /// The server answered 401 on an authenticated call.
    #[error("authorization required")]
    Unauthorized,

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Transport failure. The URL is stripped so query parameters (the new
    /// password on `edit-password`) never reach the message.
    #[error("network: {0}")]
    Network(reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("session storage: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network(e.without_url())
    }
}

impl ClientError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}
