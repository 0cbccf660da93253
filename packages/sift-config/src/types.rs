use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub paging: Paging,
	#[serde(default)]
	pub recommendation: Recommendation,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Page-size and cursor bounds shared by every list view.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging {
	/// Used when `limit` is absent or not a number.
	#[serde(default = "default_limit")]
	pub default_limit: u32,
	/// Upper clamp for `limit`. Never above 100.
	#[serde(default = "default_max_limit")]
	pub max_limit: u32,
	/// Number of same-category jobs shown next to a pinned job.
	#[serde(default = "default_related_limit")]
	pub related_limit: u32,
	/// Cursor tokens longer than this are discarded without decoding.
	#[serde(default = "default_max_cursor_chars")]
	pub max_cursor_chars: usize,
}
impl Default for Paging {
	fn default() -> Self {
		Self {
			default_limit: default_limit(),
			max_limit: default_max_limit(),
			related_limit: default_related_limit(),
			max_cursor_chars: default_max_cursor_chars(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Recommendation {
	/// Drop the skill/category narrowing when it leaves no candidates at all.
	#[serde(default = "default_true")]
	pub fallback_on_empty: bool,
}
impl Default for Recommendation {
	fn default() -> Self {
		Self { fallback_on_empty: true }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_limit() -> u32 {
	10
}

fn default_max_limit() -> u32 {
	100
}

fn default_related_limit() -> u32 {
	20
}

fn default_max_cursor_chars() -> usize {
	1_024
}

fn default_true() -> bool {
	true
}
