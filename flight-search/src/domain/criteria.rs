//! Search criteria selecting the active upstream result set.

use chrono::NaiveDate;
use serde::Serialize;

use super::IataCode;
use super::error::DomainError;

/// Passenger counts by age band.
///
/// Only built through [`Passengers::new`], so there is always an adult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Passengers {
    /// 12 and over; at least one.
    adults: u32,

    /// 2 to 11.
    children: u32,

    /// Under 2.
    infants: u32,
}

impl Passengers {
    /// Create passenger counts, requiring at least one adult.
    pub fn new(adults: u32, children: u32, infants: u32) -> Result<Self, DomainError> {
        if adults == 0 {
            return Err(DomainError::NoAdults);
        }
        Ok(Self {
            adults,
            children,
            infants,
        })
    }

    pub fn adults(&self) -> u32 {
        self.adults
    }

    pub fn children(&self) -> u32 {
        self.children
    }

    pub fn infants(&self) -> u32 {
        self.infants
    }

    /// Total number of travellers, saturating at `u32::MAX`.
    pub fn total(&self) -> u32 {
        self.adults
            .saturating_add(self.children)
            .saturating_add(self.infants)
    }
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

/// What the user searched for.
///
/// Valid by construction: origin and destination differ, there is at least
/// one adult, and a return date never precedes the departure date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FilterCriteria {
    origin: IataCode,
    destination: IataCode,
    passengers: Passengers,
    departure_date: NaiveDate,
    return_date: Option<NaiveDate>,
}

impl FilterCriteria {
    /// Create one-way criteria for a single adult.
    pub fn new(
        origin: IataCode,
        destination: IataCode,
        departure_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if origin == destination {
            return Err(DomainError::SameOriginAndDestination(origin));
        }
        Ok(Self {
            origin,
            destination,
            passengers: Passengers::default(),
            departure_date,
            return_date: None,
        })
    }

    /// Set passenger counts.
    pub fn with_passengers(mut self, passengers: Passengers) -> Self {
        self.passengers = passengers;
        self
    }

    /// Add a return date, which must not precede the departure date.
    pub fn with_return_date(mut self, return_date: NaiveDate) -> Result<Self, DomainError> {
        if return_date < self.departure_date {
            return Err(DomainError::ReturnBeforeDeparture {
                departure: self.departure_date,
                return_date,
            });
        }
        self.return_date = Some(return_date);
        Ok(self)
    }

    /// Reject criteria whose departure or return date lies before `today`.
    ///
    /// Travelling today is allowed.
    pub fn ensure_not_past(&self, today: NaiveDate) -> Result<(), DomainError> {
        if self.departure_date < today {
            return Err(DomainError::DateInPast {
                field: "departure",
                date: self.departure_date,
            });
        }
        match self.return_date {
            Some(date) if date < today => Err(DomainError::DateInPast {
                field: "return",
                date,
            }),
            _ => Ok(()),
        }
    }

    pub fn origin(&self) -> IataCode {
        self.origin
    }

    pub fn destination(&self) -> IataCode {
        self.destination
    }

    pub fn passengers(&self) -> Passengers {
        self.passengers
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }
}
