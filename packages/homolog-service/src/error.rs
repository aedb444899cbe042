pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Invalid settings: {message}")]
	InvalidSettings { message: String },
	#[error("Embedding provider unavailable: {message}")]
	EmbeddingUnavailable { message: String },
	#[error("Similarity search unavailable: {message}")]
	SearchUnavailable { message: String },
	#[error("Catalog store unavailable: {message}")]
	CatalogUnavailable { message: String },
	#[error("Catalog record {catalog_id} not found.")]
	RecordNotFound { catalog_id: String },
	#[error("Disambiguation oracle unavailable: {message}")]
	OracleUnavailable { message: String },
	#[error("Batch did not finish within {timeout_ms} ms.")]
	BatchTimedOut { timeout_ms: u64 },
}
impl Error {
	/// Stable machine-readable code, used in batch item errors.
	pub fn code(&self) -> &'static str {
		match self {
			Self::InvalidRequest { .. } => "invalid_request",
			Self::InvalidSettings { .. } => "invalid_settings",
			Self::EmbeddingUnavailable { .. } => "embedding_unavailable",
			Self::SearchUnavailable { .. } => "search_unavailable",
			Self::CatalogUnavailable { .. } => "catalog_unavailable",
			Self::RecordNotFound { .. } => "record_not_found",
			Self::OracleUnavailable { .. } => "oracle_unavailable",
			Self::BatchTimedOut { .. } => "batch_timed_out",
		}
	}
}

impl From<homolog_config::Error> for Error {
	fn from(err: homolog_config::Error) -> Self {
		Self::InvalidSettings { message: err.to_string() }
	}
}
