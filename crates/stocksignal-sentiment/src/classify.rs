//! Keyword sentiment classifier for Vietnamese market news.

use stocksignal_core::SentimentLabel;

/// Phrases signalling a buy call: "recommend to buy", "should buy",
/// "positive", "target price increase", "buying in".
pub const BUY_KEYWORDS: &[&str] = &[
    "khuyến nghị mua",
    "nên mua",
    "tích cực",
    "mục tiêu tăng",
    "mua vào",
];

/// Phrases signalling a sell call: "take profit", "selling off",
/// "sell pressure", "reduce position", "warning".
pub const SELL_KEYWORDS: &[&str] = &[
    "chốt lời",
    "bán ra",
    "áp lực bán",
    "giảm tỷ trọng",
    "cảnh báo",
];

/// Label an article body by keyword presence.
///
/// Matching is case-sensitive substring containment on the raw body. Buy
/// phrases are checked first, so a body containing both buy and sell phrases
/// is labelled [`SentimentLabel::Buy`].
#[must_use]
pub fn classify(body: &str) -> SentimentLabel {
    if BUY_KEYWORDS.iter().any(|kw| body.contains(kw)) {
        SentimentLabel::Buy
    } else if SELL_KEYWORDS.iter().any(|kw| body.contains(kw)) {
        SentimentLabel::Sell
    } else {
        SentimentLabel::Undetermined
    }
}
