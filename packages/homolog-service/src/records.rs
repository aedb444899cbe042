use serde::{Deserialize, Serialize};

use homolog_domain::verdict::CatalogRecord;

use crate::{Error, HomologService, Result, matching};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct EmbeddingResponse {
	pub embedding: Vec<f32>,
	pub dimension: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateRecordRequest {
	pub catalog_id: String,
	pub description: String,
}

impl HomologService {
	/// Adds a catalog record, or replaces the description stored for an existing id.
	pub async fn create_record(&self, req: CreateRecordRequest) -> Result<CatalogRecord> {
		let record = CatalogRecord {
			catalog_id: req.catalog_id.trim().to_string(),
			description: req.description.trim().to_string(),
		};

		if record.catalog_id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "catalog_id must be non-empty.".to_string(),
			});
		}
		if record.description.is_empty() {
			return Err(Error::InvalidRequest {
				message: "description must be non-empty.".to_string(),
			});
		}

		let stored = self.providers.catalog.upsert_record(&record).await?;

		tracing::info!(catalog_id = %stored.catalog_id, "Catalog record stored.");

		Ok(stored)
	}

	pub async fn get_record(&self, catalog_id: &str) -> Result<CatalogRecord> {
		let catalog_id = catalog_id.trim();

		if catalog_id.is_empty() {
			return Err(Error::InvalidRequest {
				message: "catalog_id must be non-empty.".to_string(),
			});
		}

		self.engine
			.lookup_record(catalog_id)
			.await?
			.ok_or_else(|| Error::RecordNotFound { catalog_id: catalog_id.to_string() })
	}

	/// Embedding of `text` after the same normalization used for matching.
	pub async fn embed_description(&self, text: &str) -> Result<EmbeddingResponse> {
		let description = matching::parse_description(text)?;
		let embedding = self.engine.embed(&description).await?;

		Ok(EmbeddingResponse { dimension: embedding.len(), embedding })
	}
}
