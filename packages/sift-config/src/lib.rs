mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Paging, Postgres, Recommendation, Security, Service, Storage};

use std::{fs, path::Path};

/// Hard ceiling on page size regardless of configuration.
pub const LIMIT_CEILING: u32 = 100;

const MIN_CURSOR_CHARS: usize = 64;

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	parse(path, &raw)
}

pub fn parse(path: &Path, raw: &str) -> Result<Config> {
	let mut cfg: Config = toml::from_str(raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::invalid("service.http_bind", "must be non-empty."));
	}
	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::invalid("storage.postgres.dsn", "must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::invalid("storage.postgres.pool_max_conns", "must be greater than zero."));
	}

	let paging = &cfg.paging;

	if !(1..=LIMIT_CEILING).contains(&paging.max_limit) {
		return Err(Error::invalid(
			"paging.max_limit",
			format!("must be in the range 1-{LIMIT_CEILING}."),
		));
	}
	if !(1..=paging.max_limit).contains(&paging.default_limit) {
		return Err(Error::invalid(
			"paging.default_limit",
			"must be at least 1 and at most paging.max_limit.",
		));
	}
	if !(1..=paging.max_limit).contains(&paging.related_limit) {
		return Err(Error::invalid(
			"paging.related_limit",
			"must be at least 1 and at most paging.max_limit.",
		));
	}
	if paging.max_cursor_chars < MIN_CURSOR_CHARS {
		return Err(Error::invalid(
			"paging.max_cursor_chars",
			format!("must be at least {MIN_CURSOR_CHARS}."),
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	let level = cfg.service.log_level.trim();

	cfg.service.log_level = if level.is_empty() { "info".to_string() } else { level.to_string() };
	cfg.service.http_bind = cfg.service.http_bind.trim().to_string();
}
