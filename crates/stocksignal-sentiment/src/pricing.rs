//! Price enrichment for the priced report variant.

use std::collections::HashMap;

use rust_decimal::{Decimal, RoundingStrategy};
use stocksignal_core::{ChangePercent, PriceQuote, Report, ReportRow};

/// Percentage change from `prior_close` to `current`, rounded to 2 dp.
///
/// A missing price or a zero prior close gives [`ChangePercent::NotApplicable`].
#[must_use]
pub fn change_percent(prior_close: Option<Decimal>, current: Option<Decimal>) -> ChangePercent {
    let (Some(prior), Some(current)) = (prior_close, current) else {
        return ChangePercent::NotApplicable;
    };
    if prior.is_zero() {
        return ChangePercent::NotApplicable;
    }
    current
        .checked_sub(prior)
        .and_then(|delta| delta.checked_div(prior))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(ChangePercent::NotApplicable, |pct| {
            ChangePercent::Value(pct.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        })
}

/// Build a priced copy of `report` using `quotes`.
///
/// Row order and content are kept; only the price columns are filled. Rows
/// with no quote get [`ChangePercent::NotApplicable`].
#[must_use]
pub fn apply_quotes(report: &Report, quotes: &[PriceQuote]) -> Report {
    let by_ticker: HashMap<&str, &PriceQuote> =
        quotes.iter().map(|q| (q.ticker.as_str(), q)).collect();

    let rows = report
        .rows()
        .iter()
        .map(|row| {
            let quote = by_ticker.get(row.ticker.as_str());
            let prior_close = quote.and_then(|q| q.prior_close);
            let current_price = quote.and_then(|q| q.current_price);
            ReportRow {
                prior_close,
                current_price,
                change_percent: change_percent(prior_close, current_price),
                ..row.clone()
            }
        })
        .collect();
    Report::new(rows)
}
