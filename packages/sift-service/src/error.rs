pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Caller required: {message}")]
	CallerRequired { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<sift_storage::Error> for Error {
	fn from(err: sift_storage::Error) -> Self {
		match err {
			sift_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			sift_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<sift_domain::CursorEncodeError> for Error {
	fn from(err: sift_domain::CursorEncodeError) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
