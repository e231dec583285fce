use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tokio::task::JoinError;
use tracing::{error, warn};

use crate::error::PredictError;
use crate::http::page;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error(transparent)]
    Predict(#[from] PredictError),
    #[error("No image file was uploaded")]
    MissingFile,
    #[error("malformed upload: {0}")]
    Multipart(#[from] MultipartError),
    #[error("failed to render preview: {0}")]
    Preview(#[source] image::ImageError),
    #[error("prediction task failed: {0}")]
    Join(#[from] JoinError),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Predict(e) if e.is_bad_input() => StatusCode::BAD_REQUEST,
            Self::MissingFile => StatusCode::BAD_REQUEST,
            Self::Multipart(e) => e.status(),
            Self::Predict(_) | Self::Preview(_) | Self::Join(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "rejected request");
        }
        (status, Html(page::error(status, &self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use rstest::rstest;

    #[rstest]
    #[case(HttpError::Predict(PredictError::InvalidModel("vgg".into())), StatusCode::BAD_REQUEST)]
    #[case(HttpError::MissingFile, StatusCode::BAD_REQUEST)]
    #[case(HttpError::Predict(PredictError::Model(ModelError::MissingOutput)), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(HttpError::Predict(PredictError::ScoreCount { expected: 10, actual: 3 }), StatusCode::INTERNAL_SERVER_ERROR)]
    fn maps_status(#[case] err: HttpError, #[case] expected: StatusCode) {
        assert_eq!(err.status(), expected);
    }

    #[rstest]
    fn decode_failures_are_client_errors() {
        let decode = image::load_from_memory(b"nope").unwrap_err();
        let err = HttpError::Predict(PredictError::Decode(decode));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
