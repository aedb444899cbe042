use std::sync::Arc;

use homolog_config::Config;
use homolog_domain::{
	band::{BandCounts, ClassifiedCandidates},
	description::Description,
	policy::{MatchAction, MatchMode, MatchSettings, decide_action},
	verdict::{CatalogRecord, MatchOutcome, MatchVerdict, Resolution},
};

use crate::{Error, Providers, Result};

/// Orchestrates embedding, similarity search, catalog lookup and disambiguation for one
/// description. Holds no per-match state, so clones can run on separate tasks.
#[derive(Clone)]
pub struct MatchEngine {
	cfg: Arc<Config>,
	providers: Providers,
	settings: MatchSettings,
}
impl MatchEngine {
	pub fn new(cfg: Arc<Config>, providers: Providers) -> Result<Self> {
		let settings = MatchSettings::new(&cfg.matching)?;

		Ok(Self { cfg, providers, settings })
	}

	pub fn settings(&self) -> &MatchSettings {
		&self.settings
	}

	/// Embeds the normalized form of `description`. The vector must have the configured
	/// dimension.
	pub async fn embed(&self, description: &Description) -> Result<Vec<f32>> {
		let cfg = &self.cfg.providers.embedding;
		let vectors =
			self.providers.embedding.embed(cfg, &[description.normalized().to_string()]).await?;
		let Some(vector) = vectors.into_iter().next() else {
			return Err(Error::EmbeddingUnavailable {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vector.len() != cfg.dimensions as usize {
			return Err(Error::EmbeddingUnavailable {
				message: format!(
					"Embedding has {} dimensions, expected {}.",
					vector.len(),
					cfg.dimensions
				),
			});
		}

		Ok(vector)
	}

	pub async fn run(&self, description: &Description, mode: MatchMode) -> Result<MatchOutcome> {
		let vector = self.embed(description).await?;
		let top_k = self.settings.top_k();
		let mut candidates = self.providers.search.search_similar(&vector, top_k).await?;

		candidates.truncate(top_k as usize);

		let classified = ClassifiedCandidates::classify(candidates, self.settings.thresholds());
		let counts = classified.counts();
		let action = decide_action(mode, counts);

		tracing::info!(
			mode = mode.as_str(),
			candidates = classified.len(),
			high = counts.high,
			moderate = counts.moderate,
			action = action.as_str(),
			"Candidates classified."
		);

		match action {
			MatchAction::NoMatch => Ok(no_match(action, Resolution::BelowThreshold, counts)),
			MatchAction::ReturnTop => {
				let Some(top) = classified.top_high() else {
					return Ok(no_match(action, Resolution::BelowThreshold, counts));
				};

				tracing::info!(catalog_id = %top.id, score = top.score, "Returning top candidate.");

				Ok(MatchOutcome {
					verdict: MatchVerdict::Matched(top.id.clone()),
					action,
					resolution: Resolution::Immediate,
					counts,
					record: None,
				})
			},
			MatchAction::Escalate => self.escalate(description, &classified, counts).await,
		}
	}

	/// Record for a single catalog id, `None` when the store does not know it.
	pub async fn lookup_record(&self, catalog_id: &str) -> Result<Option<CatalogRecord>> {
		let mut records = self.providers.catalog.fetch_records(&[catalog_id.to_string()]).await?;

		Ok(records.remove(catalog_id))
	}

	async fn escalate(
		&self,
		description: &Description,
		classified: &ClassifiedCandidates,
		counts: BandCounts,
	) -> Result<MatchOutcome> {
		let action = MatchAction::Escalate;
		let ids: Vec<String> = classified.eligible().map(|candidate| candidate.id.clone()).collect();
		let mut records = self.providers.catalog.fetch_records(&ids).await?;
		let options: Vec<CatalogRecord> = ids.iter().filter_map(|id| records.remove(id)).collect();

		if options.len() < ids.len() {
			tracing::debug!(
				requested = ids.len(),
				found = options.len(),
				"Dropping candidates missing from the catalog."
			);
		}
		if options.is_empty() {
			tracing::warn!(candidate_ids = ?ids, "No catalog records for escalated candidates.");

			return Ok(no_match(action, Resolution::NoCandidateRecords, counts));
		}

		let disambiguation = match self
			.providers
			.oracle
			.disambiguate(&self.cfg.providers.disambiguator, description.raw(), &options)
			.await
		{
			Ok(disambiguation) => disambiguation,
			Err(err) => {
				tracing::warn!(
					error = %err,
					options = options.len(),
					"Disambiguation oracle unavailable; treating as no match."
				);

				return Ok(no_match(action, Resolution::OracleUnavailable, counts));
			},
		};
		let Some(selected_id) = disambiguation.selected_id else {
			tracing::info!(
				confidence = disambiguation.confidence,
				reasoning = %disambiguation.reasoning,
				"Disambiguation oracle abstained."
			);

			return Ok(no_match(action, Resolution::OracleAbstained, counts));
		};
		let Some(record) = options.into_iter().find(|record| record.catalog_id == selected_id)
		else {
			tracing::warn!(
				selected_id = %selected_id,
				"Disambiguation oracle selected an id outside the offered options."
			);

			return Ok(no_match(action, Resolution::OracleUnknownSelection, counts));
		};

		tracing::info!(
			catalog_id = %record.catalog_id,
			confidence = disambiguation.confidence,
			reasoning = %disambiguation.reasoning,
			"Disambiguation oracle selected a candidate."
		);

		Ok(MatchOutcome {
			verdict: MatchVerdict::Matched(record.catalog_id.clone()),
			action,
			resolution: Resolution::OracleSelected,
			counts,
			record: Some(record),
		})
	}
}

fn no_match(action: MatchAction, resolution: Resolution, counts: BandCounts) -> MatchOutcome {
	MatchOutcome { verdict: MatchVerdict::NoMatch, action, resolution, counts, record: None }
}
