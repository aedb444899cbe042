use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = homolog_match::Args::parse();

	homolog_match::run(args).await
}
