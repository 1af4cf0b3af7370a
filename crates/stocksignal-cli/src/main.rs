mod report;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stocksignal_core::Recommendation;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "stocksignal-cli")]
#[command(about = "Ticker sentiment report from Vietnamese financial news")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch news, build a fresh report and save it
    Run {
        /// Priced dataset CSV (`ticker,priorClose,current`); overrides `STOCKSIGNAL_PRICES_PATH`
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Email the fresh report to this address
        #[arg(long)]
        email: Option<String>,

        /// Print the report without saving it
        #[arg(long)]
        dry_run: bool,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the saved report
    Show {
        #[arg(long, value_enum)]
        recommendation: Option<RecommendationArg>,

        /// Ticker prefix (case-insensitive)
        #[arg(long)]
        ticker: Option<String>,

        /// Only rows with both prices
        #[arg(long)]
        priced: bool,
    },
    /// Email the saved report
    Email {
        #[arg(long)]
        to: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecommendationArg {
    Buy,
    Sell,
}

impl From<RecommendationArg> for Recommendation {
    fn from(arg: RecommendationArg) -> Self {
        match arg {
            RecommendationArg::Buy => Recommendation::Buy,
            RecommendationArg::Sell => Recommendation::Sell,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = stocksignal_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run {
            prices,
            email,
            dry_run,
            json,
        } => {
            let options = run::RunOptions {
                prices: prices.or_else(|| config.prices_path.clone()),
                email,
                dry_run,
                json,
            };
            run::run_report(&config, &options).await
        }
        Commands::Show {
            recommendation,
            ticker,
            priced,
        } => {
            let filter = stocksignal_core::ReportFilter {
                recommendation: recommendation.map(Recommendation::from),
                ticker_prefix: ticker,
                priced_only: priced,
            };
            report::show_report(&config, &filter)
        }
        Commands::Email { to } => report::email_report(&config, &to).await,
    }
}
