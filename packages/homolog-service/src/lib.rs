pub mod batch;
pub mod engine;
pub mod matching;
pub mod records;

mod error;

pub use batch::{BatchItemResult, BatchMatchItem, BatchMatchRequest, BatchSettings};
pub use engine::MatchEngine;
pub use error::{Error, Result};
pub use matching::{MatchRequest, MatchedVehicle, ResponseShape};
pub use records::{CreateRecordRequest, EmbeddingResponse};

use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use homolog_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use homolog_domain::verdict::{CandidateScore, CatalogRecord, Disambiguation};
use homolog_providers::{disambiguation, embedding};
use homolog_storage::{catalog, db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

pub trait SimilaritySearch
where
	Self: Send + Sync,
{
	/// Nearest catalog entries, best score first.
	fn search_similar<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<CandidateScore>>>;
}

pub trait CatalogStore
where
	Self: Send + Sync,
{
	/// Records keyed by catalog id. Unknown ids are missing from the map, not errors.
	fn fetch_records<'a>(
		&'a self,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, CatalogRecord>>>;

	/// Inserts `record`, replacing the description when the id already exists.
	fn upsert_record<'a>(
		&'a self,
		record: &'a CatalogRecord,
	) -> BoxFuture<'a, Result<CatalogRecord>>;
}

pub trait DisambiguationOracle
where
	Self: Send + Sync,
{
	fn disambiguate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		description: &'a str,
		options: &'a [CatalogRecord],
	) -> BoxFuture<'a, Result<Disambiguation>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub search: Arc<dyn SimilaritySearch>,
	pub catalog: Arc<dyn CatalogStore>,
	pub oracle: Arc<dyn DisambiguationOracle>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		search: Arc<dyn SimilaritySearch>,
		catalog: Arc<dyn CatalogStore>,
		oracle: Arc<dyn DisambiguationOracle>,
	) -> Self {
		Self { embedding, search, catalog, oracle }
	}

	/// HTTP providers for embedding and disambiguation, Qdrant for search, Postgres for records.
	pub fn from_storage(db: Db, qdrant: QdrantStore) -> Self {
		let http = Arc::new(HttpProviders);

		Self {
			embedding: http.clone(),
			search: Arc::new(qdrant),
			catalog: Arc::new(db),
			oracle: http,
		}
	}
}

pub struct HomologService {
	pub cfg: Arc<Config>,
	pub providers: Providers,
	engine: MatchEngine,
	batch: BatchSettings,
}
impl HomologService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Result<Self> {
		Self::with_providers(cfg, Providers::from_storage(db, qdrant))
	}

	pub fn with_providers(cfg: Config, providers: Providers) -> Result<Self> {
		let batch = BatchSettings::new(&cfg.batch)?;
		let cfg = Arc::new(cfg);
		let engine = MatchEngine::new(cfg.clone(), providers.clone())?;

		Ok(Self { cfg, providers, engine, batch })
	}

	pub fn engine(&self) -> &MatchEngine {
		&self.engine
	}
}

struct HttpProviders;

impl EmbeddingProvider for HttpProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			embedding::embed(cfg, texts)
				.await
				.map_err(|err| Error::EmbeddingUnavailable { message: err.to_string() })
		})
	}
}

impl DisambiguationOracle for HttpProviders {
	fn disambiguate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		description: &'a str,
		options: &'a [CatalogRecord],
	) -> BoxFuture<'a, Result<Disambiguation>> {
		Box::pin(async move {
			disambiguation::disambiguate(cfg, description, options)
				.await
				.map_err(|err| Error::OracleUnavailable { message: err.to_string() })
		})
	}
}

impl SimilaritySearch for QdrantStore {
	fn search_similar<'a>(
		&'a self,
		vector: &'a [f32],
		top_k: u32,
	) -> BoxFuture<'a, Result<Vec<CandidateScore>>> {
		Box::pin(async move {
			QdrantStore::search_similar(self, vector, top_k)
				.await
				.map_err(|err| Error::SearchUnavailable { message: err.to_string() })
		})
	}
}

impl CatalogStore for Db {
	fn fetch_records<'a>(
		&'a self,
		ids: &'a [String],
	) -> BoxFuture<'a, Result<HashMap<String, CatalogRecord>>> {
		Box::pin(async move {
			let records = catalog::fetch_records(&self.pool, ids)
				.await
				.map_err(|err| Error::CatalogUnavailable { message: err.to_string() })?;

			Ok(records.into_iter().map(|record| (record.catalog_id.clone(), record)).collect())
		})
	}

	fn upsert_record<'a>(
		&'a self,
		record: &'a CatalogRecord,
	) -> BoxFuture<'a, Result<CatalogRecord>> {
		Box::pin(async move {
			catalog::upsert_record(&self.pool, record)
				.await
				.map_err(|err| Error::CatalogUnavailable { message: err.to_string() })
		})
	}
}
