//! Airport codes and directory records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid IATA airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid IATA code: {reason}")]
pub struct InvalidIataCode {
    reason: &'static str,
}

/// A valid 3-letter IATA airport code.
///
/// IATA codes are always 3 uppercase ASCII letters. Any `IataCode` value is
/// valid by construction.
///
/// # Examples
///
/// ```
/// use flight_search::domain::IataCode;
///
/// let lax = IataCode::parse("LAX").unwrap();
/// assert_eq!(lax.as_str(), "LAX");
///
/// // Strict parsing rejects lowercase, normalized parsing accepts it
/// assert!(IataCode::parse("lax").is_err());
/// assert_eq!(IataCode::parse_normalized(" lax ").unwrap(), lax);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IataCode([u8; 3]);

impl IataCode {
    /// Parse an IATA code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidIataCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidIataCode {
                reason: "must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidIataCode {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(IataCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// upper-cased before validation.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidIataCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IataCode({})", self.as_str())
    }
}

impl fmt::Display for IataCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for IataCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IataCode {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        IataCode::parse_normalized(&s).map_err(serde::de::Error::custom)
    }
}

/// An entry of the static airport directory.
///
/// Records come from a hand-maintained dataset, so every field is optional on
/// the wire: missing or `null` `code` and `name` deserialize as empty strings
/// and simply never match a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

impl Airport {
    /// Create an airport without a city.
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            city: None,
        }
    }

    /// Set the city.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }
}

fn null_as_empty<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(IataCode::parse("LAX").is_ok());
        assert!(IataCode::parse("KUL").is_ok());
        assert!(IataCode::parse("IKA").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(IataCode::parse("lax").is_err());
        assert!(IataCode::parse("Lax").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(IataCode::parse("").is_err());
        assert!(IataCode::parse("LA").is_err());
        assert!(IataCode::parse("LAXX").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(IataCode::parse("L4X").is_err());
        assert!(IataCode::parse("L X").is_err());
        assert!(IataCode::parse("LÄX").is_err());
    }

    #[test]
    fn normalized_parse() {
        let code = IataCode::parse_normalized("  kul\n").unwrap();
        assert_eq!(code.as_str(), "KUL");
        assert!(IataCode::parse_normalized("ku").is_err());
    }

    #[test]
    fn display_and_debug() {
        let code = IataCode::parse("IKA").unwrap();
        assert_eq!(format!("{code}"), "IKA");
        assert_eq!(format!("{code:?}"), "IataCode(IKA)");
    }

    #[test]
    fn serde_roundtrip_uses_plain_string() {
        let code = IataCode::parse("LAX").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"LAX\"");

        let parsed: IataCode = serde_json::from_str("\"lax\"").unwrap();
        assert_eq!(parsed, code);
        assert!(serde_json::from_str::<IataCode>("\"LAXX\"").is_err());
    }

    #[test]
    fn airport_missing_fields_default_to_empty() {
        let airport: Airport = serde_json::from_str(r#"{"name": "Nowhere"}"#).unwrap();
        assert_eq!(airport.code, "");
        assert_eq!(airport.name, "Nowhere");
        assert_eq!(airport.city, None);
    }

    #[test]
    fn airport_null_fields_default_to_empty() {
        let airport: Airport =
            serde_json::from_str(r#"{"code": null, "name": null, "city": null}"#).unwrap();
        assert_eq!(airport, Airport::default());
    }
}
