use std::{
	fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
};

use clap::Parser;

use homolog_match::{Args, Command, RecordCommand, read_descriptions};

static NEXT_INPUT: AtomicU64 = AtomicU64::new(0);

fn write_temp_input(contents: &str) -> PathBuf {
	let index = NEXT_INPUT.fetch_add(1, Ordering::SeqCst);
	let path = std::env::temp_dir()
		.join(format!("homolog_match_input_{}_{}.txt", std::process::id(), index));

	fs::write(&path, contents).expect("Failed to write test input.");

	path
}

#[test]
fn parses_match_with_flags() {
	let args = Args::try_parse_from([
		"homolog-match",
		"-c",
		"homolog.toml",
		"match",
		"NISSAN VERSA 2019",
		"--strict",
		"--full",
	])
	.expect("Arguments must parse.");

	assert_eq!(args.config, PathBuf::from("homolog.toml"));

	let Command::Match { description, flags } = args.command else {
		panic!("Expected match command.");
	};

	assert_eq!(description, "NISSAN VERSA 2019");
	assert!(flags.strict);
	assert!(flags.full);
}

#[test]
fn match_defaults_to_non_strict_id_only() {
	let args = Args::try_parse_from(["homolog-match", "-c", "homolog.toml", "match", "VERSA"])
		.expect("Arguments must parse.");
	let Command::Match { flags, .. } = args.command else {
		panic!("Expected match command.");
	};

	assert!(!flags.strict);
	assert!(!flags.full);
}

#[test]
fn batch_rejects_input_file_with_inline_descriptions() {
	let parsed = Args::try_parse_from([
		"homolog-match",
		"-c",
		"homolog.toml",
		"batch",
		"--input",
		"items.txt",
		"VERSA 2019",
	]);

	assert!(parsed.is_err());
}

#[test]
fn config_flag_is_required() {
	assert!(Args::try_parse_from(["homolog-match", "record", "get", "V-1"]).is_err());
}

#[test]
fn parses_record_add() {
	let args = Args::try_parse_from([
		"homolog-match",
		"-c",
		"homolog.toml",
		"record",
		"add",
		"V-6",
		"KIA RIO LX 1.6 MT 2021",
	])
	.expect("Arguments must parse.");
	let Command::Record { action: RecordCommand::Add { catalog_id, description } } = args.command
	else {
		panic!("Expected record add command.");
	};

	assert_eq!(catalog_id, "V-6");
	assert_eq!(description, "KIA RIO LX 1.6 MT 2021");
}

#[test]
fn record_requires_an_action() {
	assert!(Args::try_parse_from(["homolog-match", "-c", "homolog.toml", "record", "V-1"]).is_err());
	assert!(
		Args::try_parse_from(["homolog-match", "-c", "homolog.toml", "record", "add", "V-6"])
			.is_err()
	);
}

#[test]
fn input_file_skips_blank_lines() {
	let path = write_temp_input("NISSAN VERSA 2019\n\n   \n  TOYOTA COROLLA 2020  \n");
	let descriptions = read_descriptions(Some(&path), Vec::new()).expect("Input must load.");

	assert_eq!(descriptions, vec!["NISSAN VERSA 2019", "TOYOTA COROLLA 2020"]);

	fs::remove_file(&path).ok();
}

#[test]
fn inline_descriptions_are_kept_in_order() {
	let descriptions =
		read_descriptions(None, vec!["B".to_string(), "A".to_string()]).expect("Inline input.");

	assert_eq!(descriptions, vec!["B", "A"]);
}

#[test]
fn missing_batch_input_is_an_error() {
	assert!(read_descriptions(None, Vec::new()).is_err());
}
