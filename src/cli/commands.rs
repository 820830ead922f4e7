use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "archivist")]
#[command(author, version, about = "Store and retrieve encrypted ticket transcripts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Retrieve a transcript and print it as JSON
    Get {
        #[arg(short, long)]
        guild: u64,

        #[arg(short, long)]
        ticket: i32,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Archive a JSON array of messages
    Store {
        #[arg(short, long)]
        guild: u64,

        #[arg(short, long)]
        ticket: i32,

        /// File containing a JSON array of messages
        #[arg(short, long)]
        input: PathBuf,

        /// Use the premium retention tier
        #[arg(long)]
        premium: bool,
    },

    /// Import an already-serialized (v2) transcript without rebuilding it
    Import {
        #[arg(short, long)]
        guild: u64,

        #[arg(short, long)]
        ticket: i32,

        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        premium: bool,
    },

    /// Render a JSON array of messages to a document via the archive service
    Render {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(short, long)]
        output: PathBuf,
    },
}
