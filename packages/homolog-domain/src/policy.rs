use serde::{Deserialize, Serialize};

use homolog_config::Matching;

use crate::band::{BandCounts, Thresholds};

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
	#[default]
	NonStrict,
	Strict,
}
impl MatchMode {
	pub fn from_strict(strict: bool) -> Self {
		if strict { Self::Strict } else { Self::NonStrict }
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::NonStrict => "non_strict",
			Self::Strict => "strict",
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchAction {
	ReturnTop,
	Escalate,
	NoMatch,
}
impl MatchAction {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::ReturnTop => "return_top",
			Self::Escalate => "escalate",
			Self::NoMatch => "no_match",
		}
	}
}

/// Mode policy over band counts.
///
/// | mode       | high | moderate | action     |
/// |------------|------|----------|------------|
/// | either     | 0    | 0        | no match   |
/// | non-strict | 1    | 0        | return top |
/// | non-strict | ≥ 2  | any      | escalate   |
/// | non-strict | ≤ 1  | ≥ 1      | escalate   |
/// | strict     | any  | any      | escalate   |
pub fn decide_action(mode: MatchMode, counts: BandCounts) -> MatchAction {
	match (mode, counts.high, counts.moderate) {
		(_, 0, 0) => MatchAction::NoMatch,
		(MatchMode::NonStrict, 1, 0) => MatchAction::ReturnTop,
		(MatchMode::NonStrict, 2.., _) => MatchAction::Escalate,
		(MatchMode::NonStrict, 0..=1, 1..) => MatchAction::Escalate,
		(MatchMode::Strict, _, _) => MatchAction::Escalate,
	}
}

/// Engine settings, validated once when built.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchSettings {
	top_k: u32,
	thresholds: Thresholds,
}
impl MatchSettings {
	pub fn new(matching: &Matching) -> homolog_config::Result<Self> {
		homolog_config::validate_matching(matching)?;

		Ok(Self {
			top_k: matching.top_k,
			thresholds: Thresholds::new_unchecked(
				matching.high_threshold,
				matching.best_effort_threshold,
			),
		})
	}

	pub fn top_k(&self) -> u32 {
		self.top_k
	}

	pub fn thresholds(&self) -> &Thresholds {
		&self.thresholds
	}
}

#[cfg(test)]
mod tests {
	use super::{MatchAction, MatchMode, MatchSettings, decide_action};
	use crate::band::BandCounts;
	use homolog_config::Matching;

	fn counts(high: usize, moderate: usize) -> BandCounts {
		BandCounts { high, moderate }
	}

	#[test]
	fn single_high_diverges_between_modes() {
		assert_eq!(decide_action(MatchMode::NonStrict, counts(1, 0)), MatchAction::ReturnTop);
		assert_eq!(decide_action(MatchMode::Strict, counts(1, 0)), MatchAction::Escalate);
	}

	#[test]
	fn extreme_counts_are_covered() {
		assert_eq!(
			decide_action(MatchMode::NonStrict, counts(usize::MAX, 0)),
			MatchAction::Escalate
		);
		assert_eq!(
			decide_action(MatchMode::NonStrict, counts(1, usize::MAX)),
			MatchAction::Escalate
		);
		assert_eq!(
			decide_action(MatchMode::Strict, counts(0, usize::MAX)),
			MatchAction::Escalate
		);
	}

	#[test]
	fn settings_reject_inverted_thresholds() {
		let matching = Matching { top_k: 5, high_threshold: 0.7, best_effort_threshold: 0.8 };

		assert!(MatchSettings::new(&matching).is_err());
	}

	#[test]
	fn settings_reject_zero_top_k() {
		let matching = Matching { top_k: 0, ..Matching::default() };

		assert!(MatchSettings::new(&matching).is_err());
	}
}
