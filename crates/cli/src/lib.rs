pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "presente",
    about = "PresenteCerto operator CLI",
    long_about = "Inspect configuration, check upstream readiness, build landing slugs and sitemaps, and run the recommendation chain from the terminal.",
    after_help = "Examples:\n  presente doctor --json\n  presente slug encode --relationship Mãe --occasion Natal\n  presente recommend --answer relationship=3 --answer budget=\"Até R$ 50\""
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Show effective configuration values with their source, secrets redacted")]
    Config,
    #[command(about = "Check configuration, catalog reachability and upstream readiness")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
        #[arg(long, help = "Also send a sample prompt to the oracle")]
        live: bool,
    },
    #[command(subcommand, about = "Encode or decode landing page slugs")]
    Slug(SlugCommand),
    #[command(about = "Render sitemap.xml for every landing page")]
    Sitemap {
        #[arg(long, help = "Write the sitemap to this file instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Run the recommendation chain for a set of quiz answers")]
    Recommend {
        #[arg(
            long = "answer",
            value_name = "QUESTION=VALUE",
            help = "Answer by option number or label, e.g. relationship=3 or age=\"51-65 anos\""
        )]
        answers: Vec<String>,
    },
}

#[derive(Debug, Subcommand)]
enum SlugCommand {
    #[command(about = "Build a slug from profile labels")]
    Encode {
        #[arg(long)]
        relationship: String,
        #[arg(long)]
        personality: Option<String>,
        #[arg(long)]
        occasion: Option<String>,
    },
    #[command(about = "Read the profile a slug stands for")]
    Decode { slug: String },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::config::run(),
        Command::Doctor { json, live } => commands::doctor::run(json, live),
        Command::Slug(SlugCommand::Encode { relationship, personality, occasion }) => {
            commands::slug::encode(&relationship, personality.as_deref(), occasion.as_deref())
        }
        Command::Slug(SlugCommand::Decode { slug }) => commands::slug::decode(&slug),
        Command::Sitemap { output } => commands::sitemap::run(output.as_deref()),
        Command::Recommend { answers } => commands::recommend::run(&answers),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
