use serde::{Deserialize, Serialize};

use crate::{band::BandCounts, policy::MatchAction};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CandidateScore {
	pub id: String,
	pub score: f32,
}
impl CandidateScore {
	pub fn new(id: impl Into<String>, score: f32) -> Self {
		Self { id: id.into(), score }
	}
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct CatalogRecord {
	pub catalog_id: String,
	pub description: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MatchVerdict {
	Matched(String),
	NoMatch,
}
impl MatchVerdict {
	pub fn catalog_id(&self) -> Option<&str> {
		match self {
			Self::Matched(id) => Some(id.as_str()),
			Self::NoMatch => None,
		}
	}

	pub fn is_match(&self) -> bool {
		matches!(self, Self::Matched(_))
	}
}

/// Why a verdict was reached. Never changes the verdict itself.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
	Immediate,
	BelowThreshold,
	OracleSelected,
	OracleAbstained,
	OracleUnavailable,
	OracleUnknownSelection,
	NoCandidateRecords,
}
impl Resolution {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Immediate => "immediate",
			Self::BelowThreshold => "below_threshold",
			Self::OracleSelected => "oracle_selected",
			Self::OracleAbstained => "oracle_abstained",
			Self::OracleUnavailable => "oracle_unavailable",
			Self::OracleUnknownSelection => "oracle_unknown_selection",
			Self::NoCandidateRecords => "no_candidate_records",
		}
	}
}

/// Answer of the disambiguation oracle.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Disambiguation {
	#[serde(default)]
	pub selected_id: Option<String>,
	#[serde(default)]
	pub confidence: f32,
	#[serde(default)]
	pub reasoning: String,
}
impl Disambiguation {
	pub fn abstain(reasoning: impl Into<String>) -> Self {
		Self { selected_id: None, confidence: 0.0, reasoning: reasoning.into() }
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct MatchOutcome {
	pub verdict: MatchVerdict,
	pub action: MatchAction,
	pub resolution: Resolution,
	pub counts: BandCounts,
	/// Record of the selected candidate when the oracle path already fetched it.
	pub record: Option<CatalogRecord>,
}

#[cfg(test)]
mod tests {
	use super::{Disambiguation, Resolution};

	#[test]
	fn disambiguation_tolerates_missing_fields() {
		let parsed: Disambiguation =
			serde_json::from_value(serde_json::json!({ "selected_id": null }))
				.expect("parse failed");

		assert_eq!(parsed, Disambiguation::abstain(""));
	}

	#[test]
	fn resolution_serializes_snake_case() {
		let value = serde_json::to_value(Resolution::OracleUnknownSelection).expect("serialize");

		assert_eq!(value, serde_json::json!(Resolution::OracleUnknownSelection.as_str()));
	}
}
