use serde::{Deserialize, Serialize};

use homolog_domain::{
	description::{Description, DescriptionReject},
	policy::MatchMode,
	verdict::{CatalogRecord, MatchOutcome, MatchVerdict},
};

use crate::{Error, HomologService, MatchEngine, Result};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
	#[default]
	IdOnly,
	Full,
}
impl ResponseShape {
	pub fn from_full(full: bool) -> Self {
		if full { Self::Full } else { Self::IdOnly }
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MatchRequest {
	pub description: String,
	#[serde(default)]
	pub strict: bool,
	#[serde(default)]
	pub response: ResponseShape,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct MatchedVehicle {
	pub catalog_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}
impl From<CatalogRecord> for MatchedVehicle {
	fn from(record: CatalogRecord) -> Self {
		Self { catalog_id: record.catalog_id, description: Some(record.description) }
	}
}

impl HomologService {
	pub async fn match_one(&self, req: MatchRequest) -> Result<Option<MatchedVehicle>> {
		match_text(
			&self.engine,
			&req.description,
			MatchMode::from_strict(req.strict),
			req.response,
		)
		.await
	}
}

pub(crate) fn parse_description(text: &str) -> Result<Description> {
	Description::new(text).map_err(|reject| match reject {
		DescriptionReject::Empty => Error::InvalidRequest {
			message: "description must be non-empty.".to_string(),
		},
	})
}

pub(crate) async fn match_text(
	engine: &MatchEngine,
	text: &str,
	mode: MatchMode,
	shape: ResponseShape,
) -> Result<Option<MatchedVehicle>> {
	let description = parse_description(text)?;
	let outcome = engine.run(&description, mode).await?;

	shape_outcome(engine, outcome, shape).await
}

async fn shape_outcome(
	engine: &MatchEngine,
	outcome: MatchOutcome,
	shape: ResponseShape,
) -> Result<Option<MatchedVehicle>> {
	let MatchVerdict::Matched(catalog_id) = outcome.verdict else {
		return Ok(None);
	};

	if shape == ResponseShape::IdOnly {
		return Ok(Some(MatchedVehicle { catalog_id, description: None }));
	}

	let record = match outcome.record {
		Some(record) => Some(record),
		None => engine.lookup_record(&catalog_id).await?,
	};

	match record {
		Some(record) => Ok(Some(MatchedVehicle::from(record))),
		None => {
			tracing::warn!(
				catalog_id = %catalog_id,
				"Matched catalog id has no record; reporting no match."
			);

			Ok(None)
		},
	}
}
