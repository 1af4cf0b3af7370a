//! Article, label and report types shared by the pipeline and its consumers.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::CoreError;

/// Column headers of the report table, in their fixed order.
pub const REPORT_COLUMNS: [&str; 6] = [
    "ticker",
    "recommendation",
    "priorClose",
    "current",
    "changePercent",
    "justification",
];

/// One fetched news article. `body` is empty when the article page could not
/// be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub url: String,
    pub title: String,
    pub body: String,
}

impl Article {
    /// Title and body joined by a single space; the text tickers are read from.
    #[must_use]
    pub fn combined_text(&self) -> String {
        format!("{} {}", self.title, self.body)
    }
}

/// Keyword-derived sentiment of one article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SentimentLabel {
    Buy,
    Sell,
    Undetermined,
}

impl SentimentLabel {
    /// The tally direction this label feeds, if any.
    #[must_use]
    pub fn recommendation(self) -> Option<Recommendation> {
        match self {
            SentimentLabel::Buy => Some(Recommendation::Buy),
            SentimentLabel::Sell => Some(Recommendation::Sell),
            SentimentLabel::Undetermined => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Recommendation {
    Buy,
    Sell,
}

impl Recommendation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Buy => "Buy",
            Recommendation::Sell => "Sell",
        }
    }

    /// Vietnamese verb used in report justifications.
    #[must_use]
    pub fn vietnamese_verb(self) -> &'static str {
        match self {
            Recommendation::Buy => "MUA",
            Recommendation::Sell => "BÁN",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = CoreError;

    /// Accepts the English labels case-insensitively, plus the Vietnamese
    /// `Mua` / `Bán` labels found in older snapshots.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("buy") || trimmed == "Mua" {
            Ok(Recommendation::Buy)
        } else if trimmed.eq_ignore_ascii_case("sell") || trimmed == "Bán" {
            Ok(Recommendation::Sell)
        } else {
            Err(CoreError::InvalidRecommendation(trimmed.to_string()))
        }
    }
}

/// Day-over-day price change of a report row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangePercent {
    /// The row was built without price data; renders as an empty cell.
    Unpriced,
    /// Prices were supplied but the change cannot be computed.
    NotApplicable,
    /// Percentage change, already rounded to two decimal places.
    Value(Decimal),
}

impl ChangePercent {
    pub const NOT_APPLICABLE: &'static str = "N/A";

    /// Parse a rendered cell back into a value (`""`, `N/A`, `+1.25%`, `-0.40%`).
    ///
    /// Returns `None` for anything else.
    #[must_use]
    pub fn from_rendered(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Some(ChangePercent::Unpriced);
        }
        if trimmed == Self::NOT_APPLICABLE {
            return Some(ChangePercent::NotApplicable);
        }
        let number = trimmed.strip_suffix('%')?;
        let number = number.strip_prefix('+').unwrap_or(number);
        Decimal::from_str(number).ok().map(ChangePercent::Value)
    }
}

impl fmt::Display for ChangePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangePercent::Unpriced => Ok(()),
            ChangePercent::NotApplicable => f.write_str(Self::NOT_APPLICABLE),
            ChangePercent::Value(value) => {
                let sign = if value.is_sign_negative() { "" } else { "+" };
                write!(f, "{sign}{value:.2}%")
            }
        }
    }
}

impl Serialize for ChangePercent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One finalized recommendation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRow {
    pub ticker: String,
    pub recommendation: Recommendation,
    pub prior_close: Option<Decimal>,
    #[serde(rename = "current")]
    pub current_price: Option<Decimal>,
    pub change_percent: ChangePercent,
    pub justification: String,
}

impl ReportRow {
    /// Whether both prices are present.
    #[must_use]
    pub fn is_priced(&self) -> bool {
        self.prior_close.is_some() && self.current_price.is_some()
    }
}

/// Ordered report table. Built once per run and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Report {
    rows: Vec<ReportRow>,
}

impl Report {
    #[must_use]
    pub fn new(rows: Vec<ReportRow>) -> Self {
        Self { rows }
    }

    #[must_use]
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<ReportRow> {
        self.rows
    }

    /// Rows matching `filter`, in report order.
    #[must_use]
    pub fn filtered(&self, filter: &ReportFilter) -> Vec<ReportRow> {
        self.rows
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect()
    }
}

/// User-selected criteria for narrowing a report view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub recommendation: Option<Recommendation>,
    /// Case-insensitive ticker prefix.
    pub ticker_prefix: Option<String>,
    pub priced_only: bool,
}

impl ReportFilter {
    #[must_use]
    pub fn matches(&self, row: &ReportRow) -> bool {
        if self
            .recommendation
            .is_some_and(|rec| rec != row.recommendation)
        {
            return false;
        }
        if let Some(prefix) = self.ticker_prefix.as_deref() {
            let prefix = prefix.trim().to_ascii_uppercase();
            if !row.ticker.starts_with(&prefix) {
                return false;
            }
        }
        !self.priced_only || row.is_priced()
    }
}

/// One entry of an external priced dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceQuote {
    pub ticker: String,
    pub prior_close: Option<Decimal>,
    pub current_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, recommendation: Recommendation, priced: bool) -> ReportRow {
        ReportRow {
            ticker: ticker.to_string(),
            recommendation,
            prior_close: priced.then(|| Decimal::new(50_900, 0)),
            current_price: priced.then(|| Decimal::new(51_200, 0)),
            change_percent: if priced {
                ChangePercent::Value(Decimal::new(59, 2))
            } else {
                ChangePercent::Unpriced
            },
            justification: "test".to_string(),
        }
    }

    #[test]
    fn change_percent_renders_explicit_sign() {
        assert_eq!(ChangePercent::Value(Decimal::new(59, 2)).to_string(), "+0.59%");
        assert_eq!(ChangePercent::Value(Decimal::new(-125, 2)).to_string(), "-1.25%");
        assert_eq!(ChangePercent::Value(Decimal::ZERO).to_string(), "+0.00%");
        assert_eq!(ChangePercent::Value(Decimal::new(15, 1)).to_string(), "+1.50%");
    }

    #[test]
    fn change_percent_markers_render() {
        assert_eq!(ChangePercent::NotApplicable.to_string(), "N/A");
        assert_eq!(ChangePercent::Unpriced.to_string(), "");
    }

    #[test]
    fn change_percent_parses_rendered_forms() {
        assert_eq!(
            ChangePercent::from_rendered("+0.59%"),
            Some(ChangePercent::Value(Decimal::new(59, 2)))
        );
        assert_eq!(
            ChangePercent::from_rendered("-1.25%"),
            Some(ChangePercent::Value(Decimal::new(-125, 2)))
        );
        assert_eq!(
            ChangePercent::from_rendered("N/A"),
            Some(ChangePercent::NotApplicable)
        );
        assert_eq!(ChangePercent::from_rendered(""), Some(ChangePercent::Unpriced));
        assert_eq!(ChangePercent::from_rendered("abc%"), None);
        assert_eq!(ChangePercent::from_rendered("0.59"), None);
    }

    #[test]
    fn recommendation_parses_english_and_vietnamese() {
        assert_eq!("buy".parse::<Recommendation>().unwrap(), Recommendation::Buy);
        assert_eq!("SELL".parse::<Recommendation>().unwrap(), Recommendation::Sell);
        assert_eq!("Mua".parse::<Recommendation>().unwrap(), Recommendation::Buy);
        assert_eq!("Bán".parse::<Recommendation>().unwrap(), Recommendation::Sell);
        assert!(matches!(
            "hold".parse::<Recommendation>(),
            Err(CoreError::InvalidRecommendation(ref v)) if v == "hold"
        ));
    }

    #[test]
    fn sentiment_label_maps_to_direction() {
        assert_eq!(
            SentimentLabel::Buy.recommendation(),
            Some(Recommendation::Buy)
        );
        assert_eq!(
            SentimentLabel::Sell.recommendation(),
            Some(Recommendation::Sell)
        );
        assert_eq!(SentimentLabel::Undetermined.recommendation(), None);
    }

    #[test]
    fn combined_text_joins_title_and_body() {
        let article = Article {
            url: "https://cafef.vn/a.chn".to_string(),
            title: "Cổ phiếu FPT".to_string(),
            body: String::new(),
        };
        assert_eq!(article.combined_text(), "Cổ phiếu FPT ");
    }

    #[test]
    fn filter_by_recommendation_and_prefix() {
        let report = Report::new(vec![
            row("FPT", Recommendation::Buy, false),
            row("FRT", Recommendation::Sell, false),
            row("VIC", Recommendation::Buy, false),
        ]);

        let buys = report.filtered(&ReportFilter {
            recommendation: Some(Recommendation::Buy),
            ..ReportFilter::default()
        });
        assert_eq!(buys.len(), 2);

        let f_prefix = report.filtered(&ReportFilter {
            ticker_prefix: Some("f".to_string()),
            ..ReportFilter::default()
        });
        let tickers: Vec<&str> = f_prefix.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, vec!["FPT", "FRT"]);
    }

    #[test]
    fn filter_priced_only_drops_unpriced_rows() {
        let report = Report::new(vec![
            row("FPT", Recommendation::Buy, true),
            row("VIC", Recommendation::Buy, false),
        ]);
        let priced = report.filtered(&ReportFilter {
            priced_only: true,
            ..ReportFilter::default()
        });
        assert_eq!(priced.len(), 1);
        assert_eq!(priced[0].ticker, "FPT");
    }

    #[test]
    fn report_row_serializes_with_fixed_column_names() {
        let json = serde_json::to_value(row("FPT", Recommendation::Buy, true)).expect("serialize");
        for column in REPORT_COLUMNS {
            assert!(json.get(column).is_some(), "missing column {column}");
        }
        assert_eq!(json["changePercent"], "+0.59%");
        assert_eq!(json["recommendation"], "Buy");
    }
}
