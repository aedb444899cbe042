use homolog_config::Matching;
use homolog_domain::{
	band::{BandCounts, ClassifiedCandidates},
	policy::{MatchAction, MatchMode, MatchSettings, decide_action},
	verdict::CandidateScore,
};

const GRID: usize = 10;

fn default_settings() -> MatchSettings {
	MatchSettings::new(&Matching::default()).expect("Default matching settings must validate.")
}

fn expected_action(mode: MatchMode, high: usize, moderate: usize) -> MatchAction {
	let rows = [
		(mode == MatchMode::NonStrict && high == 1 && moderate == 0, MatchAction::ReturnTop),
		(mode == MatchMode::NonStrict && high >= 2, MatchAction::Escalate),
		(mode == MatchMode::NonStrict && high <= 1 && moderate >= 1, MatchAction::Escalate),
		(mode == MatchMode::Strict && high + moderate >= 1, MatchAction::Escalate),
		(high == 0 && moderate == 0, MatchAction::NoMatch),
	];
	let matched: Vec<MatchAction> =
		rows.iter().filter(|(applies, _)| *applies).map(|(_, action)| *action).collect();

	assert_eq!(
		matched.len(),
		1,
		"Decision table must select exactly one row for {mode:?} H={high} M={moderate}."
	);

	matched[0]
}

#[test]
fn decision_table_is_exhaustive_and_exclusive_over_grid() {
	for mode in [MatchMode::NonStrict, MatchMode::Strict] {
		for high in 0..=GRID {
			for moderate in 0..=GRID {
				let counts = BandCounts { high, moderate };

				assert_eq!(
					decide_action(mode, counts),
					expected_action(mode, high, moderate),
					"Mismatch for {mode:?} H={high} M={moderate}."
				);
			}
		}
	}
}

#[test]
fn decision_is_deterministic() {
	for high in 0..=GRID {
		for moderate in 0..=GRID {
			let counts = BandCounts { high, moderate };

			assert_eq!(
				decide_action(MatchMode::NonStrict, counts),
				decide_action(MatchMode::NonStrict, counts)
			);
		}
	}
}

#[test]
fn single_high_candidate_returns_top_in_non_strict() {
	let settings = default_settings();
	let classified =
		ClassifiedCandidates::classify(vec![CandidateScore::new("V-1", 0.90)], settings.thresholds());

	assert_eq!(classified.counts(), BandCounts { high: 1, moderate: 0 });
	assert_eq!(decide_action(MatchMode::NonStrict, classified.counts()), MatchAction::ReturnTop);
	assert_eq!(decide_action(MatchMode::Strict, classified.counts()), MatchAction::Escalate);
}

#[test]
fn two_high_candidates_escalate() {
	let settings = default_settings();
	let classified = ClassifiedCandidates::classify(
		vec![CandidateScore::new("V-1", 0.91), CandidateScore::new("V-2", 0.88)],
		settings.thresholds(),
	);

	assert_eq!(decide_action(MatchMode::NonStrict, classified.counts()), MatchAction::Escalate);
}

#[test]
fn single_moderate_candidate_escalates_in_both_modes() {
	let settings = default_settings();
	let classified =
		ClassifiedCandidates::classify(vec![CandidateScore::new("V-1", 0.80)], settings.thresholds());

	assert_eq!(classified.counts(), BandCounts { high: 0, moderate: 1 });
	assert_eq!(decide_action(MatchMode::NonStrict, classified.counts()), MatchAction::Escalate);
	assert_eq!(decide_action(MatchMode::Strict, classified.counts()), MatchAction::Escalate);
}

#[test]
fn all_rejected_candidates_yield_no_match() {
	let settings = default_settings();
	let classified = ClassifiedCandidates::classify(
		vec![CandidateScore::new("V-1", 0.69), CandidateScore::new("V-2", 0.12)],
		settings.thresholds(),
	);

	for mode in [MatchMode::NonStrict, MatchMode::Strict] {
		assert_eq!(decide_action(mode, classified.counts()), MatchAction::NoMatch);
	}
}

#[test]
fn mode_flag_maps_from_strict_bool() {
	assert_eq!(MatchMode::from_strict(true), MatchMode::Strict);
	assert_eq!(MatchMode::from_strict(false), MatchMode::NonStrict);
}
