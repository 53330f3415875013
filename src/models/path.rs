use crate::models::RandomSource;
use crate::series::{PriceObservation, PriceSeries, ReturnStats};
use chrono::{Days, NaiveDate};

/// Day-stepped geometric random walk from the last known close.
///
/// price_{t+1} = price_t * (1 + change),  change ~ N(mean, stdev)
///
/// Steps every calendar day (weekends included) from `last.date + 1`
/// through `end_date`. Output has exactly `end_date - last.date` days.
///
/// Returns an empty series when `end_date <= last.date` or the history
/// has fewer than 2 observations. Each step depends on the previous
/// price, so the walk is strictly sequential.
///
/// Prices are not clamped: a draw with `change <= -1` produces a zero or
/// negative close, and later steps keep compounding from it. Such closes
/// would be rejected by `PriceObservation::new`.
pub fn simulate_future_path<S: RandomSource + ?Sized>(
    series: &PriceSeries,
    end_date: NaiveDate,
    stats: &ReturnStats,
    source: &mut S,
) -> PriceSeries {
    if series.len() < 2 {
        return PriceSeries::empty();
    }
    let Some(last) = series.last() else {
        return PriceSeries::empty();
    };
    if end_date <= last.date {
        return PriceSeries::empty();
    }

    let days = (end_date - last.date).num_days() as usize;
    let mut future = PriceSeries::with_capacity(days);

    let mut price = last.close;
    let mut date = last.date;
    while date < end_date {
        let Some(next) = date.checked_add_days(Days::new(1)) else {
            break;
        };
        date = next;

        let change = source.normal(stats.mean, stats.stdev);
        price *= 1.0 + change;

        future.push_next(PriceObservation { date, close: price });
    }

    future
}
