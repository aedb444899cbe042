use serde::{Deserialize, Serialize};

use crate::verdict::CandidateScore;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
	High,
	Moderate,
	Reject,
}

/// Validated threshold pair; `best_effort < high`, both within `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Thresholds {
	high: f32,
	best_effort: f32,
}
impl Thresholds {
	pub(crate) fn new_unchecked(high: f32, best_effort: f32) -> Self {
		Self { high, best_effort }
	}

	pub fn high(&self) -> f32 {
		self.high
	}

	pub fn best_effort(&self) -> f32 {
		self.best_effort
	}

	/// NaN scores fail every comparison and land in [`ConfidenceBand::Reject`].
	pub fn classify(&self, score: f32) -> ConfidenceBand {
		if score >= self.high {
			ConfidenceBand::High
		} else if score >= self.best_effort {
			ConfidenceBand::Moderate
		} else {
			ConfidenceBand::Reject
		}
	}
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct BandCounts {
	pub high: usize,
	pub moderate: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassifiedCandidate {
	pub candidate: CandidateScore,
	pub band: ConfidenceBand,
}

/// Candidates in provider order, each tagged with its band.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClassifiedCandidates {
	items: Vec<ClassifiedCandidate>,
}
impl ClassifiedCandidates {
	pub fn classify(candidates: Vec<CandidateScore>, thresholds: &Thresholds) -> Self {
		let items = candidates
			.into_iter()
			.map(|candidate| {
				let band = thresholds.classify(candidate.score);

				ClassifiedCandidate { candidate, band }
			})
			.collect();

		Self { items }
	}

	pub fn counts(&self) -> BandCounts {
		self.items.iter().fold(BandCounts::default(), |mut counts, item| {
			match item.band {
				ConfidenceBand::High => counts.high += 1,
				ConfidenceBand::Moderate => counts.moderate += 1,
				ConfidenceBand::Reject => {},
			}

			counts
		})
	}

	/// First `high` candidate in provider order.
	pub fn top_high(&self) -> Option<&CandidateScore> {
		self.items
			.iter()
			.find(|item| item.band == ConfidenceBand::High)
			.map(|item| &item.candidate)
	}

	/// Candidates at or above the best-effort threshold, provider order preserved.
	pub fn eligible(&self) -> impl Iterator<Item = &CandidateScore> {
		self.items
			.iter()
			.filter(|item| item.band != ConfidenceBand::Reject)
			.map(|item| &item.candidate)
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}
}
