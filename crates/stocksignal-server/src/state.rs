//! Shared server state and the refresh operation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use stocksignal_core::{AppConfig, Report};
use stocksignal_mailer::{MailTransport, SmtpMailer};
use stocksignal_scraper::NewsClient;
use stocksignal_sentiment::{apply_quotes, run_pipeline, PipelineError, PipelineSettings, PipelineSummary};
use stocksignal_store::{load_price_quotes, ReportStore, StoreError};
use tokio::sync::{Mutex, RwLock};

/// The report currently served to readers and when it was produced.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub report: Option<Report>,
    pub last_update: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct AppState {
    pub store: ReportStore,
    pub client: Arc<NewsClient>,
    pub settings: Arc<PipelineSettings>,
    pub prices_path: Option<PathBuf>,
    pub mailer: Option<Arc<dyn MailTransport>>,
    pub dashboard: Arc<RwLock<DashboardState>>,
    /// Held for the duration of a refresh so runs never overlap.
    pub run_lock: Arc<Mutex<()>>,
    pub run_timeout: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RefreshError {
    #[error("pipeline run exceeded {0}s and was cancelled")]
    Timeout(u64),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("failed to save report: {0}")]
    Store(#[from] StoreError),
}

/// A published refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub report: Report,
    pub summary: PipelineSummary,
    pub last_update: DateTime<Utc>,
}

impl AppState {
    /// Builds state from config. The dashboard starts empty; call
    /// [`AppState::load_snapshot`] to seed it from the store.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP client or the SMTP relay cannot be configured.
    pub fn from_app_config(config: &AppConfig) -> anyhow::Result<Self> {
        let client = NewsClient::from_app_config(config)?;
        let mailer = match &config.smtp {
            Some(smtp) => Some(Arc::new(SmtpMailer::from_config(smtp)?) as Arc<dyn MailTransport>),
            None => {
                tracing::warn!("SMTP not configured; email delivery disabled");
                None
            }
        };

        Ok(Self {
            store: ReportStore::new(config.report_path.clone()),
            client: Arc::new(client),
            settings: Arc::new(PipelineSettings::from_app_config(config)),
            prices_path: config.prices_path.clone(),
            mailer,
            dashboard: Arc::new(RwLock::new(DashboardState::default())),
            run_lock: Arc::new(Mutex::new(())),
            run_timeout: Duration::from_secs(config.run_timeout_secs),
        })
    }

    /// Seed the dashboard from the report file, using its modification time
    /// as the last update.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read.
    pub async fn load_snapshot(&self) -> Result<(), StoreError> {
        let report = self.store.read()?;
        let last_update = report.as_ref().and_then(|_| self.store.modified_at());
        if let Some(report) = &report {
            tracing::info!(path = %self.store.path().display(), rows = report.len(), "loaded stored report");
        }
        *self.dashboard.write().await = DashboardState { report, last_update };
        Ok(())
    }

    /// Run the pipeline, price the result if a priced dataset is configured,
    /// persist it and publish it to the dashboard.
    ///
    /// The previous report stays visible until the new one is saved. Nothing
    /// is published if the run fails or times out.
    ///
    /// # Errors
    ///
    /// See [`RefreshError`].
    pub async fn refresh(&self) -> Result<RefreshOutcome, RefreshError> {
        let _guard = self.run_lock.lock().await;

        let outcome = tokio::time::timeout(self.run_timeout, run_pipeline(&self.client, &self.settings))
            .await
            .map_err(|_| RefreshError::Timeout(self.run_timeout.as_secs()))??;

        let report = self.priced(outcome.report);
        self.store.write(&report)?;

        let last_update = Utc::now();
        {
            let mut dashboard = self.dashboard.write().await;
            dashboard.report = Some(report.clone());
            dashboard.last_update = Some(last_update);
        }

        Ok(RefreshOutcome {
            report,
            summary: outcome.summary,
            last_update,
        })
    }

    fn priced(&self, report: Report) -> Report {
        let Some(path) = &self.prices_path else {
            return report;
        };
        match load_price_quotes(path) {
            Ok(quotes) => apply_quotes(&report, &quotes),
            Err(e) => {
                tracing::warn!(error = %e, path = %path.display(), "price dataset unavailable; publishing unpriced report");
                report
            }
        }
    }
}
