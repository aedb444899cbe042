use serde::Deserialize;
use serde_json::{Map, Value};

pub const DEFAULT_TOP_K: u32 = 5;
pub const DEFAULT_HIGH_THRESHOLD: f32 = 0.85;
pub const DEFAULT_BEST_EFFORT_THRESHOLD: f32 = 0.70;
pub const DEFAULT_ID_PAYLOAD_KEY: &str = "catalog_id";

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub matching: Matching,
	#[serde(default)]
	pub batch: Batch,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Service {
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
	/// Payload field holding the catalog identifier of each point.
	#[serde(default = "default_id_payload_key")]
	pub id_payload_key: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
	pub disambiguator: LlmProviderConfig,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub temperature: f32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Thresholds and candidate budget for the match decision engine.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Matching {
	pub top_k: u32,
	pub high_threshold: f32,
	pub best_effort_threshold: f32,
}
impl Default for Matching {
	fn default() -> Self {
		Self {
			top_k: DEFAULT_TOP_K,
			high_threshold: DEFAULT_HIGH_THRESHOLD,
			best_effort_threshold: DEFAULT_BEST_EFFORT_THRESHOLD,
		}
	}
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Batch {
	/// Upper bound on items matched at the same time.
	pub max_concurrency: u32,
	pub max_items: u32,
	/// Deadline for a whole batch; in-flight items are aborted when it fires.
	pub timeout_ms: u64,
}
impl Default for Batch {
	fn default() -> Self {
		Self { max_concurrency: 4, max_items: 500, timeout_ms: 120_000 }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_id_payload_key() -> String {
	DEFAULT_ID_PAYLOAD_KEY.to_string()
}
