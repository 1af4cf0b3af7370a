//! Pipeline orchestration.

use serde::Serialize;
use stocksignal_core::{AppConfig, Article, Report, SentimentLabel};
use stocksignal_scraper::{NewsClient, NewsSource};

use crate::aggregate::{aggregate, ClassifiedArticle, SignalTallies};
use crate::error::PipelineError;
use crate::rank::{build_report, ReportOptions};

/// Everything one run needs besides the HTTP client.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub source: NewsSource,
    pub article_limit: usize,
    pub max_concurrent: usize,
    pub report: ReportOptions,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            source: NewsSource::from_app_config(config),
            article_limit: config.article_limit,
            max_concurrent: config.max_concurrent_articles,
            report: ReportOptions {
                top_n: config.top_n,
                source_label: config.source_label.clone(),
            },
        }
    }
}

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub articles: usize,
    pub degraded_articles: usize,
    pub buy_articles: usize,
    pub sell_articles: usize,
    pub undetermined_articles: usize,
    pub buy_tickers: usize,
    pub sell_tickers: usize,
    pub rows: usize,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: Report,
    pub tallies: SignalTallies,
    pub summary: PipelineSummary,
}

/// Run extraction, classification, aggregation and ranking over fetched
/// articles. `degraded` is the number of articles whose page failed to load.
#[must_use]
pub fn analyze(articles: Vec<Article>, degraded: usize, options: &ReportOptions) -> PipelineOutcome {
    let classified: Vec<ClassifiedArticle> = articles
        .into_iter()
        .map(ClassifiedArticle::from_article)
        .collect();

    for c in &classified {
        tracing::debug!(
            url = %c.article.url,
            label = ?c.label,
            tickers = ?c.tickers,
            "classified article"
        );
    }

    let count_label = |label: SentimentLabel| classified.iter().filter(|c| c.label == label).count();
    let tallies = aggregate(&classified);
    let report = build_report(&tallies, options);

    let summary = PipelineSummary {
        articles: classified.len(),
        degraded_articles: degraded,
        buy_articles: count_label(SentimentLabel::Buy),
        sell_articles: count_label(SentimentLabel::Sell),
        undetermined_articles: count_label(SentimentLabel::Undetermined),
        buy_tickers: tallies.buy.len(),
        sell_tickers: tallies.sell.len(),
        rows: report.len(),
    };

    PipelineOutcome {
        report,
        tallies,
        summary,
    }
}

/// Fetch articles and build a fresh report.
///
/// Holds no state between calls. Dropping the returned future before it
/// resolves discards whatever was fetched.
///
/// # Errors
///
/// Returns [`PipelineError::Listing`] if the listing page cannot be fetched.
/// Individual article failures are absorbed (see [`NewsClient::fetch_articles`]).
pub async fn run_pipeline(
    client: &NewsClient,
    settings: &PipelineSettings,
) -> Result<PipelineOutcome, PipelineError> {
    let batch = client
        .fetch_articles(&settings.source, settings.article_limit, settings.max_concurrent)
        .await?;

    let outcome = analyze(batch.articles, batch.degraded, &settings.report);
    tracing::info!(
        articles = outcome.summary.articles,
        degraded = outcome.summary.degraded_articles,
        buy_tickers = outcome.summary.buy_tickers,
        sell_tickers = outcome.summary.sell_tickers,
        rows = outcome.summary.rows,
        "pipeline run complete"
    );
    Ok(outcome)
}
