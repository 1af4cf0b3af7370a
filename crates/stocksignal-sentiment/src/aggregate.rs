//! Per-ticker article tallies.

use std::collections::HashMap;

use stocksignal_core::{Article, Recommendation, SentimentLabel};

use crate::classify::classify;
use crate::extract::extract_tickers;

/// An article with its extracted tickers and sentiment label.
#[derive(Debug, Clone)]
pub struct ClassifiedArticle {
    pub article: Article,
    /// Distinct tickers, in first-appearance order.
    pub tickers: Vec<String>,
    pub label: SentimentLabel,
}

impl ClassifiedArticle {
    /// Extract tickers from title + body and classify the body.
    #[must_use]
    pub fn from_article(article: Article) -> Self {
        let tickers = extract_tickers(&article.combined_text());
        let label = classify(&article.body);
        Self {
            article,
            tickers,
            label,
        }
    }
}

/// Ticker → article count for one direction, remembering the order in
/// which tickers were first counted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    entries: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn increment(&mut self, ticker: &str) {
        if let Some(&pos) = self.index.get(ticker) {
            self.entries[pos].1 += 1;
        } else {
            self.index.insert(ticker.to_string(), self.entries.len());
            self.entries.push((ticker.to_string(), 1));
        }
    }

    #[must_use]
    pub fn get(&self, ticker: &str) -> usize {
        self.index.get(ticker).map_or(0, |&pos| self.entries[pos].1)
    }

    /// `(ticker, count)` pairs in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(t, c)| (t.as_str(), *c))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The Buy and Sell tallies for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignalTallies {
    pub buy: Tally,
    pub sell: Tally,
}

impl SignalTallies {
    #[must_use]
    pub fn for_direction(&self, direction: Recommendation) -> &Tally {
        match direction {
            Recommendation::Buy => &self.buy,
            Recommendation::Sell => &self.sell,
        }
    }
}

/// Count, per direction, how many articles mention each ticker.
///
/// An article adds one to its direction's tally for every distinct ticker it
/// mentions. Undetermined articles add nothing.
#[must_use]
pub fn aggregate(articles: &[ClassifiedArticle]) -> SignalTallies {
    let mut tallies = SignalTallies::default();
    for classified in articles {
        let tally = match classified.label {
            SentimentLabel::Buy => &mut tallies.buy,
            SentimentLabel::Sell => &mut tallies.sell,
            SentimentLabel::Undetermined => continue,
        };
        for ticker in &classified.tickers {
            tally.increment(ticker);
        }
    }
    tallies
}
