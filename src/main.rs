use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process::ExitCode;
use tracing::info;

use sheetbridge::commands::{self, CommandError};
use sheetbridge::Settings;

#[derive(Parser)]
#[command(name = "sheetbridge")]
#[command(about = "Read Microsoft Excel and Google Sheets data as normalized JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Print single-line JSON instead of pretty output
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List available operations
    Index,
    /// Read records from the configured Microsoft Excel workbook
    Excel,
    /// Read records from the configured Google Sheets range
    Google,
    /// Read both sources and summarize each
    Compare,
    /// Show which sources are configured
    Health,
    /// Resolve the Excel document's drive and item ids
    Locate {
        /// GUID fragment of the document id (overrides EXCEL_DOCUMENT_ID)
        #[arg(long)]
        document_id: Option<String>,

        /// Keyword expected in the file name (overrides EXCEL_NAME_HINT)
        #[arg(long)]
        name_hint: Option<String>,

        /// Site to search (overrides SHAREPOINT_SITE_ID)
        #[arg(long)]
        site_id: Option<String>,
    },
    /// List worksheets of the Excel document
    Worksheets,
}

fn print_json<T: Serialize>(value: &T, compact: bool) {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    match text {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn finish<T: Serialize>(result: Result<T, CommandError>, compact: bool) -> ExitCode {
    match result {
        Ok(value) => {
            print_json(&value, compact);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_json(&e, compact);
            ExitCode::FAILURE
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut settings = Settings::from_env();

    info!("sheetbridge v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Index => finish(Ok(commands::index()), cli.compact),
        Command::Excel => finish(commands::microsoft_excel(&settings).await, cli.compact),
        Command::Google => finish(commands::google_sheets(&settings).await, cli.compact),
        Command::Compare => finish(Ok(commands::compare(&settings).await), cli.compact),
        Command::Health => finish(Ok(commands::health(&settings)), cli.compact),
        Command::Locate { document_id, name_hint, site_id } => {
            // Explicit lookup arguments bypass any fixed coordinate
            if document_id.is_some() || name_hint.is_some() {
                settings.excel.drive_id = None;
                settings.excel.item_id = None;
                settings.excel.share_url = None;
            }
            settings.excel.document_id = document_id.or(settings.excel.document_id);
            settings.excel.name_hint = name_hint.or(settings.excel.name_hint);
            settings.excel.site_id = site_id.or(settings.excel.site_id);

            finish(commands::locate_document(&settings).await, cli.compact)
        }
        Command::Worksheets => {
            let result = commands::locate_document(&settings).await.map(|r| r.worksheets);
            finish(result, cli.compact)
        }
    }
}
