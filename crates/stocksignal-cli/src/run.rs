//! The batch pipeline command.

use std::path::PathBuf;

use anyhow::Context;
use stocksignal_core::AppConfig;
use stocksignal_mailer::send_report;
use stocksignal_scraper::NewsClient;
use stocksignal_sentiment::{apply_quotes, run_pipeline, PipelineSettings};
use stocksignal_store::{load_price_quotes, ReportStore};

use crate::report::{format_table, mailer_from_config};

#[derive(Debug, Clone, Default)]
pub(crate) struct RunOptions {
    pub prices: Option<PathBuf>,
    pub email: Option<String>,
    pub dry_run: bool,
    pub json: bool,
}

/// Run the pipeline once, price it if a dataset is given, save and print it.
///
/// # Errors
///
/// Returns an error if the listing page cannot be fetched, the priced
/// dataset cannot be loaded, or the report cannot be saved. A failed email
/// is reported but does not fail the run.
pub(crate) async fn run_report(config: &AppConfig, options: &RunOptions) -> anyhow::Result<()> {
    let client = NewsClient::from_app_config(config)?;
    let settings = PipelineSettings::from_app_config(config);

    let outcome = tokio::time::timeout(
        std::time::Duration::from_secs(config.run_timeout_secs),
        run_pipeline(&client, &settings),
    )
    .await
    .with_context(|| format!("pipeline run exceeded {}s", config.run_timeout_secs))??;

    let report = match &options.prices {
        Some(path) => {
            let quotes = load_price_quotes(path)
                .with_context(|| format!("loading price dataset {}", path.display()))?;
            apply_quotes(&outcome.report, &quotes)
        }
        None => outcome.report,
    };

    if options.dry_run {
        println!("dry-run: report not saved");
    } else {
        let store = ReportStore::new(config.report_path.clone());
        store.write(&report)?;
        println!("saved {} rows to {}", report.len(), store.path().display());
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome.summary)?);
    } else {
        println!(
            "articles: {} ({} unreachable), buy: {}, sell: {}, undetermined: {}",
            outcome.summary.articles,
            outcome.summary.degraded_articles,
            outcome.summary.buy_articles,
            outcome.summary.sell_articles,
            outcome.summary.undetermined_articles
        );
    }
    print!("{}", format_table(report.rows()));

    if let Some(recipient) = &options.email {
        match mailer_from_config(config)? {
            Some(mailer) => {
                let delivery = send_report(&mailer, &report, recipient).await;
                println!("{}", delivery.message);
            }
            None => println!("email delivery is not configured; skipping email to {recipient}"),
        }
    }

    Ok(())
}
