use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    /// No backup directory exists for the device.
    DeviceNotFound(String),
    /// The device directory exists but holds no backup file.
    BackupMissing(String),
    FileNotFound,
    /// The requested path escapes the device's backup directory.
    PathViolation,
    /// A registry field contains the `:` delimiter.
    FieldContainsDelimiter(&'static str),
    DaemonUnreachable(anyhow::Error),
    Internal(anyhow::Error),
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::DeviceNotFound(device) => {
                write!(f, "No backups found for '{device}'.")
            }
            ApiError::BackupMissing(device) => {
                write!(f, "No backup files for '{device}'.")
            }
            ApiError::FileNotFound => f.write_str("File not found."),
            ApiError::PathViolation => f.write_str("Invalid file path."),
            ApiError::FieldContainsDelimiter(field) => {
                write!(f, "Field '{field}' must not contain the ':' delimiter.")
            }
            ApiError::DaemonUnreachable(error) => {
                write!(f, "Error: {error}")
            }
            ApiError::Internal(_) => {
                write!(f, "An internal error occurred. Please try again later.")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!("{}", message);
        let status = match &self {
            ApiError::PathViolation | ApiError::FieldContainsDelimiter(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DeviceNotFound(_) | ApiError::BackupMissing(_) | ApiError::FileNotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::DaemonUnreachable(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(err) => {
                tracing::error!("{:?}", err);
                err.chain()
                    .skip(1)
                    .for_each(|cause| tracing::error!("Because: {}", cause));
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, message).into_response()
    }
}

impl<E> From<E> for ApiError
where
    E: Into<anyhow::Error>,
{
    fn from(value: E) -> Self {
        Self::Internal(value.into())
    }
}
