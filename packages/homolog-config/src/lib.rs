mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Batch, Config, DEFAULT_BEST_EFFORT_THRESHOLD, DEFAULT_HIGH_THRESHOLD, DEFAULT_ID_PAYLOAD_KEY,
	DEFAULT_TOP_K, EmbeddingProviderConfig, LlmProviderConfig, Matching, Postgres, Providers,
	Qdrant, Service, Storage,
};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	validate_matching(&cfg.matching)?;

	if cfg.storage.postgres.dsn.trim().is_empty() {
		return Err(Error::validation("storage.postgres.dsn must be non-empty."));
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::validation("storage.postgres.pool_max_conns must be greater than zero."));
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::validation("storage.qdrant.collection must be non-empty."));
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::validation(
			"providers.embedding.dimensions must be greater than zero.",
		));
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::validation(
			"providers.embedding.dimensions must match storage.qdrant.vector_dim.",
		));
	}

	for (label, timeout_ms) in [
		("embedding", cfg.providers.embedding.timeout_ms),
		("disambiguator", cfg.providers.disambiguator.timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::validation(format!(
				"Provider {label} timeout_ms must be greater than zero."
			)));
		}
	}
	for (label, key) in [
		("embedding", &cfg.providers.embedding.api_key),
		("disambiguator", &cfg.providers.disambiguator.api_key),
	] {
		if key.trim().is_empty() {
			return Err(Error::validation(format!("Provider {label} api_key must be non-empty.")));
		}
	}

	let temperature = cfg.providers.disambiguator.temperature;

	if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
		return Err(Error::validation(
			"providers.disambiguator.temperature must be a finite number in the range 0.0-2.0.",
		));
	}

	validate_batch(&cfg.batch)
}

/// Checks the threshold pair and candidate budget used by the decision engine.
pub fn validate_matching(matching: &Matching) -> Result<()> {
	if matching.top_k == 0 {
		return Err(Error::validation("matching.top_k must be greater than zero."));
	}

	for (label, value) in [
		("matching.high_threshold", matching.high_threshold),
		("matching.best_effort_threshold", matching.best_effort_threshold),
	] {
		if !value.is_finite() {
			return Err(Error::validation(format!("{label} must be a finite number.")));
		}
		if !(0.0..=1.0).contains(&value) {
			return Err(Error::validation(format!("{label} must be in the range 0.0-1.0.")));
		}
	}

	if matching.best_effort_threshold >= matching.high_threshold {
		return Err(Error::validation(
			"matching.best_effort_threshold must be less than matching.high_threshold.",
		));
	}

	Ok(())
}

pub fn validate_batch(batch: &Batch) -> Result<()> {
	for (label, value) in [
		("batch.max_concurrency", u64::from(batch.max_concurrency)),
		("batch.max_items", u64::from(batch.max_items)),
		("batch.timeout_ms", batch.timeout_ms),
	] {
		if value == 0 {
			return Err(Error::validation(format!("{label} must be greater than zero.")));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.storage.qdrant.id_payload_key.trim().is_empty() {
		cfg.storage.qdrant.id_payload_key = DEFAULT_ID_PAYLOAD_KEY.to_string();
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
