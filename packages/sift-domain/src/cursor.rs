//! Opaque continuation cursors.
//!
//! A cursor names the last record of a page by its composite `(sort value, id)` key and is
//! signed with the `(view, sort key, direction)` it was issued under. A cursor replayed under any
//! other sort fails to decode, and callers restart from the first page.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
	sort::SortSpec,
	value::{ListRecord, Value, ValueKind},
	view::ViewSpec,
};

const CURSOR_VERSION: u8 = 1;
const SIGNATURE_BYTES: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorDecodeError {
	#[error("cursor token is empty")]
	Empty,
	#[error("cursor token exceeds max length: {len} chars (max {max})")]
	TooLong { len: usize, max: usize },
	#[error("cursor token is not base64url: {0}")]
	Encoding(String),
	#[error("cursor payload is malformed: {0}")]
	Payload(String),
	#[error("unsupported cursor version: {0}")]
	Version(u8),
	#[error("cursor was issued for a different sort: expected={expected}, actual={actual}")]
	SignatureMismatch { expected: String, actual: String },
	#[error("cursor sort value has kind {actual}, sort field expects {expected}")]
	KindMismatch { expected: ValueKind, actual: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorEncodeError {
	#[error("cursor sort value cannot be serialized: {0}")]
	Payload(String),
}

/// Decoded page boundary: the last record already handed out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
	pub sort_value: Value,
	pub tie_break_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
	v: u8,
	sig: String,
	key: Value,
	id: Uuid,
}

pub struct CursorCodec<'a> {
	view: &'a ViewSpec,
	sort: SortSpec,
	max_chars: usize,
}
impl<'a> CursorCodec<'a> {
	pub fn new(view: &'a ViewSpec, sort: SortSpec, max_chars: usize) -> Self {
		Self { view, sort, max_chars }
	}

	/// Hex prefix of `blake3(view ‖ key ‖ direction)`.
	pub fn signature(&self) -> String {
		let mut hasher = blake3::Hasher::new();

		hasher.update(self.view.name.as_bytes());
		hasher.update(&[0]);
		hasher.update(self.sort.key.as_bytes());
		hasher.update(&[0]);
		hasher.update(self.sort.direction.as_str().as_bytes());

		hasher.finalize().to_hex()[..SIGNATURE_BYTES * 2].to_string()
	}

	pub fn encode_record<R>(&self, record: &R) -> Result<String, CursorEncodeError>
	where
		R: ListRecord + ?Sized,
	{
		self.encode(&PageCursor {
			sort_value: record.value(self.sort.field),
			tie_break_id: record.record_id(),
		})
	}

	/// Fails when the sort value has no wire form, e.g. a timestamp whose offset has seconds.
	pub fn encode(&self, cursor: &PageCursor) -> Result<String, CursorEncodeError> {
		let payload = CursorPayload {
			v: CURSOR_VERSION,
			sig: self.signature(),
			key: cursor.sort_value.clone(),
			id: cursor.tie_break_id,
		};
		let json = serde_json::to_vec(&payload)
			.map_err(|err| CursorEncodeError::Payload(err.to_string()))?;

		Ok(URL_SAFE_NO_PAD.encode(json))
	}

	pub fn decode(&self, token: &str) -> Result<PageCursor, CursorDecodeError> {
		let token = token.trim();

		if token.is_empty() {
			return Err(CursorDecodeError::Empty);
		}
		if token.len() > self.max_chars {
			return Err(CursorDecodeError::TooLong { len: token.len(), max: self.max_chars });
		}

		let bytes = URL_SAFE_NO_PAD
			.decode(token)
			.map_err(|err| CursorDecodeError::Encoding(err.to_string()))?;
		let payload: CursorPayload = serde_json::from_slice(&bytes)
			.map_err(|err| CursorDecodeError::Payload(err.to_string()))?;

		if payload.v != CURSOR_VERSION {
			return Err(CursorDecodeError::Version(payload.v));
		}

		let expected = self.signature();

		if payload.sig != expected {
			return Err(CursorDecodeError::SignatureMismatch { expected, actual: payload.sig });
		}
		if payload.key.kind() != Some(self.sort.kind) {
			return Err(CursorDecodeError::KindMismatch {
				expected: self.sort.kind,
				actual: payload.key.kind().map(ValueKind::as_str).unwrap_or("null").to_string(),
			});
		}

		Ok(PageCursor { sort_value: payload.key, tie_break_id: payload.id })
	}
}
