//! Total orders over flights for each sort key.
//!
//! All keys are read from the primary leg, so one-way and round-trip offers
//! sort side by side.

use std::cmp::Ordering;

use crate::domain::{Flight, SortBy, SortOrder, SortSpec};

/// Compare two flights under `spec`.
///
/// - `Price` compares the numeric price. Prices that do not parse are a
///   provider defect and order as NaN under [`f64::total_cmp`].
/// - `Duration` compares the zero-padded "HH:MM" strings.
/// - `Departure` compares the ISO-8601 departure timestamp strings.
/// - `Stops` compares the number of intermediate stops.
///
/// `Desc` inverts the natural order; equal keys stay `Equal` in both
/// directions.
pub fn compare(a: &Flight, b: &Flight, spec: SortSpec) -> Ordering {
    let ordering = compare_key(a, b, spec.by);
    match spec.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

fn compare_key(a: &Flight, b: &Flight, by: SortBy) -> Ordering {
    let (la, lb) = (a.primary_leg(), b.primary_leg());
    match by {
        SortBy::Price => a.price_value().total_cmp(&b.price_value()),
        SortBy::Duration => la.duration.cmp(&lb.duration),
        SortBy::Departure => la.departure.at.cmp(&lb.departure.at),
        SortBy::Stops => la.stop_count().cmp(&lb.stop_count()),
    }
}

/// Stable sort: flights with equal keys keep their relative input order.
pub fn sort_flights(flights: &mut [Flight], spec: SortSpec) {
    flights.sort_by(|a, b| compare(a, b, spec));
}
