use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Args as ClapArgs, Parser, Subcommand};
use color_eyre::eyre;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use homolog_service::{
	BatchMatchRequest, CreateRecordRequest, HomologService, MatchRequest, ResponseShape,
};
use homolog_storage::{db::Db, qdrant::QdrantStore};

#[derive(Debug, Parser)]
#[command(
	version = homolog_cli::VERSION,
	rename_all = "kebab",
	styles = homolog_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Match one partner description against the catalog.
	Match {
		description: String,
		#[command(flatten)]
		flags: MatchFlags,
	},
	/// Match many descriptions; one result per input, in input order.
	Batch {
		/// File with one description per line. Blank lines are skipped.
		#[arg(long, short = 'i', value_name = "FILE", conflicts_with = "descriptions")]
		input: Option<PathBuf>,
		descriptions: Vec<String>,
		#[command(flatten)]
		flags: MatchFlags,
	},
	/// Read or write catalog records.
	Record {
		#[command(subcommand)]
		action: RecordCommand,
	},
	/// Print the embedding of a description after normalization.
	Embed { description: String },
}
impl Command {
	fn name(&self) -> &'static str {
		match self {
			Self::Match { .. } => "match",
			Self::Batch { .. } => "batch",
			Self::Record { .. } => "record",
			Self::Embed { .. } => "embed",
		}
	}
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
	/// Print the catalog record of an id.
	Get { catalog_id: String },
	/// Insert a record, or replace the description of an existing id.
	Add { catalog_id: String, description: String },
}

#[derive(Clone, Copy, Debug, ClapArgs)]
pub struct MatchFlags {
	/// Always confirm candidates with the disambiguation oracle.
	#[arg(long)]
	pub strict: bool,
	/// Include the catalog description in each match.
	#[arg(long)]
	pub full: bool,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = homolog_config::load(&args.config)?;

	init_tracing(&config)?;

	let db = Db::connect(&config.storage.postgres).await?;
	let qdrant = QdrantStore::new(&config.storage.qdrant)?;
	let service = HomologService::new(config, db, qdrant)?;
	let output = execute(&service, args.command).await?;

	println!("{}", serde_json::to_string_pretty(&output)?);

	Ok(())
}

/// Runs one command and returns its JSON answer.
pub async fn execute(service: &HomologService, command: Command) -> color_eyre::Result<Value> {
	tracing::debug!(command = command.name(), "Running command.");

	let output = match command {
		Command::Match { description, flags } => {
			let req = MatchRequest {
				description,
				strict: flags.strict,
				response: ResponseShape::from_full(flags.full),
			};

			serde_json::to_value(service.match_one(req).await?)?
		},
		Command::Batch { input, descriptions, flags } => {
			let req = BatchMatchRequest {
				descriptions: read_descriptions(input.as_deref(), descriptions)?,
				strict: flags.strict,
				response: ResponseShape::from_full(flags.full),
			};

			serde_json::to_value(service.match_batch(req).await?)?
		},
		Command::Record { action: RecordCommand::Get { catalog_id } } => {
			serde_json::to_value(service.get_record(&catalog_id).await?)?
		},
		Command::Record { action: RecordCommand::Add { catalog_id, description } } => {
			let req = CreateRecordRequest { catalog_id, description };

			serde_json::to_value(service.create_record(req).await?)?
		},
		Command::Embed { description } => {
			serde_json::to_value(service.embed_description(&description).await?)?
		},
	};

	Ok(output)
}

pub fn read_descriptions(
	input: Option<&Path>,
	inline: Vec<String>,
) -> color_eyre::Result<Vec<String>> {
	let Some(path) = input else {
		if inline.is_empty() {
			return Err(eyre::eyre!("Provide --input or at least one description."));
		}

		return Ok(inline);
	};
	let raw = fs::read_to_string(path)
		.map_err(|err| eyre::eyre!("Failed to read {}: {err}", path.display()))?;

	Ok(raw.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect())
}

fn init_tracing(config: &homolog_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	Ok(())
}
