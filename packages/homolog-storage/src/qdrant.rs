use std::collections::HashMap;

use qdrant_client::qdrant::{Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind};

use homolog_domain::verdict::CandidateScore;

use crate::{Error, Result};

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
	pub id_payload_key: String,
}
impl QdrantStore {
	pub fn new(cfg: &homolog_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_dim: cfg.vector_dim,
			id_payload_key: cfg.id_payload_key.clone(),
		})
	}

	/// Nearest catalog entries for `vector`, best score first.
	pub async fn search_similar(&self, vector: &[f32], top_k: u32) -> Result<Vec<CandidateScore>> {
		if vector.len() != self.vector_dim as usize {
			return Err(Error::InvalidArgument(format!(
				"Query vector has {} dimensions, collection expects {}.",
				vector.len(),
				self.vector_dim
			)));
		}

		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(vector.to_vec()))
			.limit(top_k as u64)
			.with_payload(true);
		let response = self.client.query(search).await?;

		Ok(scored_candidates(&response.result, &self.id_payload_key))
	}
}

fn scored_candidates(points: &[ScoredPoint], id_payload_key: &str) -> Vec<CandidateScore> {
	let mut candidates = Vec::with_capacity(points.len());

	for point in points {
		let Some(id) = payload_catalog_id(&point.payload, id_payload_key) else {
			tracing::warn!(key = id_payload_key, "Skipping search hit without a catalog id.");

			continue;
		};

		candidates.push(CandidateScore::new(id, point.score));
	}

	candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

	candidates
}

fn payload_catalog_id(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
		Some(Kind::IntegerValue(number)) => Some(number.to_string()),
		_ => None,
	}
}
