mod api_error;
mod internal_error;

pub use api_error::ApiError;
pub use internal_error::InternalError;

pub type ApiResult<T> = Result<T, ApiError>;
