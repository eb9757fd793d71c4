use clap::Parser;
use gestao_tools::config::env::load_dotenv;
use gestao_tools::core::schema::{DEFAULT_SQL_FILE, DEFAULT_TABLE};
use gestao_tools::domain::model::ProbeOutcome;
use gestao_tools::utils::logger;
use gestao_tools::{SchemaCheck, SupabaseConfig, ToolError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "schema-check")]
#[command(about = "Show how to apply the production orders schema and check whether the table exists")]
struct Args {
    /// SQL file to apply through the Supabase SQL Editor
    #[arg(long, default_value = DEFAULT_SQL_FILE)]
    sql_file: PathBuf,

    /// Table whose existence is checked
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// HTTP timeout for the check
    #[arg(long)]
    timeout_seconds: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose);
    tracing::info!("🚀 Starting schema check for table '{}'", args.table);

    load_dotenv();

    let check = SchemaCheck {
        sql_file: args.sql_file,
        table: args.table,
        timeout_seconds: args.timeout_seconds,
    };

    let mut stdout = std::io::stdout();
    match check
        .run_with_lookup(|name| std::env::var(name).ok(), &mut stdout)
        .await
    {
        Ok(report) => {
            if let ProbeOutcome::Unclassified { message } = &report.outcome {
                tracing::debug!("Unclassified probe failure: {}", message);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Schema check failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            match &e {
                ToolError::MissingConfigError { .. } | ToolError::InvalidConfigValueError { .. } => {
                    eprintln!("📝 {}", SupabaseConfig::setup_instructions());
                }
                _ => eprintln!("💡 Suggestion: {}", e.recovery_suggestion()),
            }

            let exit_code = e.severity().exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}
