//! Read-only report commands.

use std::fmt::Write as _;

use stocksignal_core::{AppConfig, ReportFilter, ReportRow};
use stocksignal_mailer::{send_report, SmtpMailer};
use stocksignal_store::ReportStore;

/// Text table of `rows` with a header line.
pub(crate) fn format_table(rows: &[ReportRow]) -> String {
    let mut out = format!(
        "{:<8}{:<6}{:>12}{:>12}{:>10}  JUSTIFICATION\n",
        "TICKER", "REC", "PRIOR", "CURRENT", "CHANGE"
    );
    for row in rows {
        let prior = row.prior_close.map(|p| p.to_string()).unwrap_or_default();
        let current = row.current_price.map(|p| p.to_string()).unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<8}{:<6}{:>12}{:>12}{:>10}  {}",
            row.ticker,
            row.recommendation.as_str(),
            prior,
            current,
            row.change_percent.to_string(),
            row.justification
        );
    }
    out
}

/// Build the SMTP mailer, or `None` when mail is not configured.
pub(crate) fn mailer_from_config(config: &AppConfig) -> anyhow::Result<Option<SmtpMailer>> {
    config
        .smtp
        .as_ref()
        .map(SmtpMailer::from_config)
        .transpose()
        .map_err(Into::into)
}

/// Print the saved report, narrowed by `filter`.
///
/// # Errors
///
/// Returns an error if the report file exists but cannot be read.
pub(crate) fn show_report(config: &AppConfig, filter: &ReportFilter) -> anyhow::Result<()> {
    let store = ReportStore::new(config.report_path.clone());
    let Some(report) = store.read()? else {
        println!(
            "no report at {}; run `stocksignal-cli run` first",
            store.path().display()
        );
        return Ok(());
    };

    let rows = report.filtered(filter);
    if let Some(updated) = store.modified_at() {
        println!("last update: {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    print!("{}", format_table(&rows));
    println!("{} of {} rows", rows.len(), report.len());
    Ok(())
}

/// Email the saved report to `to`.
///
/// # Errors
///
/// Returns an error if mail is not configured, no report exists, or the
/// delivery fails.
pub(crate) async fn email_report(config: &AppConfig, to: &str) -> anyhow::Result<()> {
    let Some(mailer) = mailer_from_config(config)? else {
        anyhow::bail!("email delivery is not configured; set STOCKSIGNAL_SMTP_HOST and credentials");
    };
    let store = ReportStore::new(config.report_path.clone());
    let Some(report) = store.read()? else {
        anyhow::bail!("no report at {}; run `stocksignal-cli run` first", store.path().display());
    };

    let outcome = send_report(&mailer, &report, to).await;
    if !outcome.delivered {
        anyhow::bail!(outcome.message);
    }
    println!("{}", outcome.message);
    Ok(())
}
