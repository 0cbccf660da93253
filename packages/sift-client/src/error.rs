pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Http(#[from] reqwest::Error),
	#[error("List request failed with status {status}: {body}")]
	Status { status: u16, body: String },
	#[error("List response could not be decoded: {0}")]
	Decode(#[from] serde_json::Error),
}
