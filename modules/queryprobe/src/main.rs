use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use queryprobe::{config, file_config, FieldPolicy, HarnessConfig};

#[derive(Parser)]
#[command(
    name = "queryprobe",
    about = "Replay natural-language queries against a text-to-SQL API and record the results"
)]
struct Cli {
    /// File with one natural-language query per line
    #[arg(long, env = "QUERYPROBE_INPUT", default_value = "user_queries.txt")]
    input: PathBuf,

    /// Endpoint that accepts the query payload
    #[arg(long, env = "QUERYPROBE_API_URL")]
    api_url: String,

    /// Directory for the dated CSV reports
    #[arg(long, env = "QUERYPROBE_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Report file prefix; the date and `.csv` are appended
    #[arg(long, env = "QUERYPROBE_REPORT_NAME", default_value = "chatbot_test_results")]
    report_name: String,

    /// TOML file with the constant payload fields
    #[arg(long, env = "QUERYPROBE_PAYLOAD_CONFIG")]
    payload_config: Option<PathBuf>,

    /// Seconds to wait for each API call
    #[arg(long, env = "QUERYPROBE_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,

    /// Record a key error when `sql_query` or `db_response` is missing
    #[arg(long)]
    strict_fields: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("queryprobe=info".parse()?)
                .add_directive("nl2sql_client=info".parse()?),
        )
        .init();

    info!("Starting query probe run");

    let cli = Cli::parse();
    let config = HarnessConfig {
        payload: file_config::load_payload_template(cli.payload_config.as_deref())?,
        headers: config::headers_from_env(),
        api_url: cli.api_url,
        input: cli.input,
        output_dir: cli.output_dir,
        report_name: cli.report_name,
        timeout: Duration::from_secs(cli.timeout_secs),
        field_policy: if cli.strict_fields {
            FieldPolicy::Strict
        } else {
            FieldPolicy::Lenient
        },
    };
    config.log_keys();

    let today = chrono::Local::now().date_naive();
    let summary = queryprobe::execute(&config, today).await?;

    info!("Run complete. {}", summary.stats);
    Ok(())
}
