use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

/// Errors raised while selecting or rendering a fragment.
#[derive(Debug, Error)]
pub enum FragmentError {
    /// The requested block does not exist in the component's template.
    #[error("fragment `{fragment}` not found in template `{template}`")]
    UnknownFragment { template: String, fragment: String },

    /// The template engine failed while rendering.
    #[error("template rendering failed: {0}")]
    Render(String),

    /// The `HX-Fragment` header exceeded the configured maximum length.
    #[error("fragment name is {len} bytes, the limit is {max}")]
    FragmentTooLong { len: usize, max: usize },

    /// The `HX-Fragment` header is not valid UTF-8.
    #[error("HX-Fragment header is not valid UTF-8")]
    MalformedFragment,

    #[error("invalid fragments configuration: {0}")]
    InvalidConfig(String),
}

impl FragmentError {
    /// Wrap any displayable template engine error.
    pub fn render(err: impl std::fmt::Display) -> Self {
        FragmentError::Render(err.to_string())
    }

    pub fn unknown(template: impl Into<String>, fragment: impl Into<String>) -> Self {
        FragmentError::UnknownFragment {
            template: template.into(),
            fragment: fragment.into(),
        }
    }
}

impl ResponseError for FragmentError {
    fn status_code(&self) -> StatusCode {
        match self {
            FragmentError::UnknownFragment { .. } => StatusCode::NOT_FOUND,
            FragmentError::FragmentTooLong { .. } | FragmentError::MalformedFragment => {
                StatusCode::BAD_REQUEST
            }
            FragmentError::Render(_) | FragmentError::InvalidConfig(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
