//! Client-side re-validation of provider results.
//!
//! The provider filters by route and date, but results are re-checked before
//! display: a flight must depart on the requested date and must not have
//! departed already.

use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::domain::Flight;

/// Source of "now" as local wall time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// The system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Whether `flight` departs on `date` (when given) strictly after `now`.
///
/// Flights whose departure timestamp does not parse are rejected.
pub fn departs_on(flight: &Flight, date: Option<NaiveDate>, now: NaiveDateTime) -> bool {
    let Some(departure) = flight.primary_leg().departure.datetime() else {
        return false;
    };

    date.is_none_or(|d| departure.date() == d) && departure > now
}

/// Keep only flights that pass [`departs_on`], preserving order.
pub fn sanity_filter(flights: &[Flight], date: Option<NaiveDate>, now: NaiveDateTime) -> Vec<Flight> {
    flights
        .iter()
        .filter(|f| departs_on(f, date, now))
        .cloned()
        .collect()
}
