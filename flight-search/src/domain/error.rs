//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from provider/IO errors.

use chrono::NaiveDate;

use super::IataCode;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Origin and destination are the same airport
    #[error("origin and destination cannot both be {0}")]
    SameOriginAndDestination(IataCode),

    /// Return date precedes the departure date
    #[error("return date {return_date} is before departure date {departure}")]
    ReturnBeforeDeparture {
        departure: NaiveDate,
        return_date: NaiveDate,
    },

    /// A travel date lies before today
    #[error("{field} date {date} is in the past")]
    DateInPast {
        field: &'static str,
        date: NaiveDate,
    },

    /// At least one adult must travel
    #[error("at least one adult passenger is required")]
    NoAdults,

    /// A flight record carried no itinerary
    #[error("flight {0} has no itineraries")]
    EmptyItineraries(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let lax = IataCode::parse("LAX").unwrap();
        let err = DomainError::SameOriginAndDestination(lax);
        assert_eq!(err.to_string(), "origin and destination cannot both be LAX");

        let err = DomainError::ReturnBeforeDeparture {
            departure: NaiveDate::from_ymd_opt(2025, 5, 21).unwrap(),
            return_date: NaiveDate::from_ymd_opt(2025, 5, 20).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "return date 2025-05-20 is before departure date 2025-05-21"
        );

        let err = DomainError::DateInPast {
            field: "return",
            date: NaiveDate::from_ymd_opt(2001, 1, 2).unwrap(),
        };
        assert_eq!(err.to_string(), "return date 2001-01-02 is in the past");

        assert_eq!(
            DomainError::NoAdults.to_string(),
            "at least one adult passenger is required"
        );
        assert_eq!(
            DomainError::EmptyItineraries("7".into()).to_string(),
            "flight 7 has no itineraries"
        );
    }
}
