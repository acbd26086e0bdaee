use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("method not allowed")]
    MethodNotAllowed,

    #[error("data parsing error: {0}")]
    DataParsing(#[from] super::types::DataParsingError),

    #[error("contact upsert failed: {0}")]
    ContactUpsert(crate::email_client::Error),
    #[error("welcome email failed: {0}")]
    WelcomeEmail(crate::email_client::Error),
}

impl Error {
    /// Both upstream failures are reported to the client the same way, only the logs tell them apart.
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::MethodNotAllowed => (StatusCode::METHOD_NOT_ALLOWED, MethodNotAllowed),
            Error::DataParsing(_) => (StatusCode::BAD_REQUEST, InvalidInput),
            Error::ContactUpsert(_) | Error::WelcomeEmail(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, UpstreamFailure)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

/// The only errors a client ever sees. The `Display` output is the `error` field of the JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Method not allowed")]
    MethodNotAllowed,
    #[display("Valid email is required")]
    InvalidInput,
    #[display("Failed to subscribe. Please try again later.")]
    UpstreamFailure,
}
