use anyhow::{Context, Result};
use archivist::cli::{Cli, Commands};
use archivist::transcript::v2;
use archivist::{utils, ArchiveError, ArchiverClient, HttpRetriever, Message, Resolvers, Settings, StoreOptions};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        utils::print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::new().context("Failed to load settings")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.logging.level)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Get {
            guild,
            ticket,
            output,
        } => handle_get(&settings, guild, ticket, output).await,
        Commands::Store {
            guild,
            ticket,
            input,
            premium,
        } => handle_store(&settings, guild, ticket, &input, premium).await,
        Commands::Import {
            guild,
            ticket,
            input,
            premium,
        } => handle_import(&settings, guild, ticket, &input, premium).await,
        Commands::Render {
            input,
            title,
            output,
        } => handle_render(&settings, &input, &title, &output).await,
    }
}

fn client(settings: &Settings) -> Result<ArchiverClient> {
    let key = Settings::encryption_key()?;
    ArchiverClient::from_settings(settings, &key)
}

fn options(premium: bool) -> StoreOptions {
    StoreOptions { premium }
}

/// Absent archives are reported the way users see them: expired
fn missing_as_expired(e: ArchiveError) -> anyhow::Error {
    if e.is_not_found() {
        anyhow::anyhow!("Transcript has expired or was never archived")
    } else {
        e.into()
    }
}

async fn read_messages(input: &Path) -> Result<Vec<Message>> {
    let raw = fs::read(input)
        .await
        .context(format!("Failed to read {:?}", input))?;
    serde_json::from_slice(&raw).context("Input is not a JSON array of messages")
}

async fn handle_get(
    settings: &Settings,
    guild: u64,
    ticket: i32,
    output: Option<PathBuf>,
) -> Result<()> {
    let client = client(settings)?;

    let transcript = client
        .retrieve(guild, ticket)
        .await
        .map_err(missing_as_expired)?;

    let value: serde_json::Value = serde_json::from_slice(&v2::serialize_v2(&transcript)?)?;
    let pretty = serde_json::to_string_pretty(&value)?;

    match output {
        Some(path) => {
            fs::write(&path, pretty)
                .await
                .context(format!("Failed to write {:?}", path))?;
            utils::print_success(&format!("Transcript written to {:?}", path));
        }
        None => println!("{}", pretty),
    }
    utils::print_transcript_summary(&transcript);
    Ok(())
}

async fn handle_store(
    settings: &Settings,
    guild: u64,
    ticket: i32,
    input: &Path,
    premium: bool,
) -> Result<()> {
    let client = client(settings)?;
    let messages = read_messages(input).await?;
    let count = messages.len();

    client
        .store_with_options(guild, ticket, messages, &Resolvers::none(), options(premium))
        .await?;

    utils::print_success(&format!(
        "Archived {} messages for guild {} ticket {}",
        count, guild, ticket
    ));
    Ok(())
}

async fn handle_import(
    settings: &Settings,
    guild: u64,
    ticket: i32,
    input: &Path,
    premium: bool,
) -> Result<()> {
    let client = client(settings)?;
    let encoded = fs::read(input)
        .await
        .context(format!("Failed to read {:?}", input))?;

    client
        .import_encoded_transcript_with_options(guild, ticket, &encoded, options(premium))
        .await?;

    utils::print_success(&format!(
        "Imported transcript for guild {} ticket {}",
        guild, ticket
    ));
    Ok(())
}

async fn handle_render(settings: &Settings, input: &Path, title: &str, output: &Path) -> Result<()> {
    let retriever = HttpRetriever::from_config(&settings.archiver)?;
    let messages = read_messages(input).await?;

    utils::print_header(&format!("Rendering \"{}\"", title));
    let rendered = retriever.render(&messages, title).await?;
    fs::write(output, &rendered)
        .await
        .context(format!("Failed to write {:?}", output))?;

    utils::print_success(&format!("Wrote {} bytes to {:?}", rendered.len(), output));
    Ok(())
}
