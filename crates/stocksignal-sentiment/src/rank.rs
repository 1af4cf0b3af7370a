//! Ranking and report building.

use stocksignal_core::{ChangePercent, Recommendation, Report, ReportRow};

use crate::aggregate::{SignalTallies, Tally};

/// One ticker's position in a direction's ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedEntry {
    pub ticker: String,
    pub direction: Recommendation,
    pub count: usize,
}

/// Report building options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Maximum entries kept per direction.
    pub top_n: usize,
    /// Source named in each justification.
    pub source_label: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: 10,
            source_label: "CafeF".to_string(),
        }
    }
}

/// Rank a tally by count, highest first, keeping at most `top_n` entries.
///
/// Ties keep discovery order.
#[must_use]
pub fn rank(tally: &Tally, direction: Recommendation, top_n: usize) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = tally
        .iter()
        .map(|(ticker, count)| RankedEntry {
            ticker: ticker.to_string(),
            direction,
            count,
        })
        .collect();
    // `sort_by` is stable.
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(top_n);
    entries
}

fn justification(entry: &RankedEntry, source_label: &str) -> String {
    format!(
        "Có {} bài/nguồn khuyến nghị {} gần đây ({source_label})",
        entry.count,
        entry.direction.vietnamese_verb()
    )
}

/// Build the unpriced report: ranked Buy rows, then ranked Sell rows.
#[must_use]
pub fn build_report(tallies: &SignalTallies, options: &ReportOptions) -> Report {
    let rows = [Recommendation::Buy, Recommendation::Sell]
        .into_iter()
        .flat_map(|direction| rank(tallies.for_direction(direction), direction, options.top_n))
        .map(|entry| ReportRow {
            justification: justification(&entry, &options.source_label),
            ticker: entry.ticker,
            recommendation: entry.direction,
            prior_close: None,
            current_price: None,
            change_percent: ChangePercent::Unpriced,
        })
        .collect();
    Report::new(rows)
}

#[cfg(test)]
mod tests {
    use stocksignal_core::Article;

    use super::*;
    use crate::aggregate::{aggregate, ClassifiedArticle};

    fn tallies_from(articles: &[(&str, &str)]) -> SignalTallies {
        let classified: Vec<ClassifiedArticle> = articles
            .iter()
            .enumerate()
            .map(|(i, (title, body))| {
                ClassifiedArticle::from_article(Article {
                    url: format!("https://cafef.vn/{i}.chn"),
                    title: (*title).to_string(),
                    body: (*body).to_string(),
                })
            })
            .collect();
        aggregate(&classified)
    }

    #[test]
    fn ranks_by_count_descending_with_stable_ties() {
        let tallies = tallies_from(&[
            ("AAA BBB", "nên mua"),
            ("CCC BBB", "nên mua"),
            ("DDD", "nên mua"),
        ]);
        let ranked = rank(&tallies.buy, Recommendation::Buy, 10);
        let order: Vec<(&str, usize)> = ranked.iter().map(|e| (e.ticker.as_str(), e.count)).collect();
        assert_eq!(order, vec![("BBB", 2), ("AAA", 1), ("CCC", 1), ("DDD", 1)]);
    }

    #[test]
    fn rank_truncates_to_top_n() {
        let titles: Vec<String> = (0..15u8)
            .map(|i| {
                let c = char::from(b'A' + i);
                format!("{c}{c}{c}")
            })
            .collect();
        let articles: Vec<(&str, &str)> = titles.iter().map(|t| (t.as_str(), "tích cực")).collect();
        let tallies = tallies_from(&articles);

        let ranked = rank(&tallies.buy, Recommendation::Buy, 10);
        assert_eq!(ranked.len(), 10);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(ranked[0].ticker, "AAA");
        assert_eq!(ranked[9].ticker, "JJJ");
    }

    #[test]
    fn report_lists_buy_rows_before_sell_rows() {
        let tallies = tallies_from(&[("Cổ phiếu FPT", "nên mua"), ("VIC giảm", "áp lực bán")]);
        let report = build_report(&tallies, &ReportOptions::default());
        assert_eq!(report.len(), 2);

        let fpt = &report.rows()[0];
        assert_eq!(fpt.ticker, "FPT");
        assert_eq!(fpt.recommendation, Recommendation::Buy);
        assert_eq!(
            fpt.justification,
            "Có 1 bài/nguồn khuyến nghị MUA gần đây (CafeF)"
        );
        assert_eq!(fpt.prior_close, None);
        assert_eq!(fpt.current_price, None);
        assert_eq!(fpt.change_percent, ChangePercent::Unpriced);

        let vic = &report.rows()[1];
        assert_eq!(vic.ticker, "VIC");
        assert_eq!(vic.recommendation, Recommendation::Sell);
        assert_eq!(
            vic.justification,
            "Có 1 bài/nguồn khuyến nghị BÁN gần đây (CafeF)"
        );
    }

    #[test]
    fn same_ticker_may_appear_in_both_directions() {
        let tallies = tallies_from(&[("HPG", "mua vào"), ("HPG", "chốt lời")]);
        let report = build_report(&tallies, &ReportOptions::default());
        let rows: Vec<(&str, Recommendation)> = report
            .rows()
            .iter()
            .map(|r| (r.ticker.as_str(), r.recommendation))
            .collect();
        assert_eq!(
            rows,
            vec![("HPG", Recommendation::Buy), ("HPG", Recommendation::Sell)]
        );
    }

    #[test]
    fn building_twice_is_identical() {
        let tallies = tallies_from(&[
            ("SSI VND HCM", "tích cực"),
            ("VND", "nên mua"),
            ("NVL PDR", "cảnh báo"),
        ]);
        let options = ReportOptions {
            top_n: 10,
            source_label: "Vietstock".to_string(),
        };
        assert_eq!(build_report(&tallies, &options), build_report(&tallies, &options));
    }

    #[test]
    fn empty_tallies_build_empty_report() {
        let report = build_report(&SignalTallies::default(), &ReportOptions::default());
        assert!(report.is_empty());
    }
}
