use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapmorphError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported image format: expected JPEG, PNG or WebP")]
    UnknownFormat,

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limited by the model API")]
    RateLimited,

    #[error("Model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Transformation failed: {0}")]
    Model(String),

    #[error("Unexpected model response: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Result fetch failed: {0}")]
    ResultFetch(String),
}

impl SnapmorphError {
    /// True for errors caught before any external call is made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            SnapmorphError::InvalidInput(_)
                | SnapmorphError::UnknownFormat
                | SnapmorphError::Decode(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SnapmorphError>;

/// Likely causes shown verbatim next to every failed transformation.
pub const LIKELY_CAUSES: [&str; 4] = [
    "Invalid API token (check REPLICATE_API_TOKEN)",
    "Rate limit exceeded (wait a few minutes)",
    "Large image file (try compressing it)",
    "Internet connection issue",
];

/// Remediation steps paired with the checklist above.
pub const SUGGESTED_FIXES: [&str; 4] = [
    "Verify your API token is correct",
    "Try a simpler prompt",
    "Use a smaller image file",
    "Wait a moment and try again",
];
