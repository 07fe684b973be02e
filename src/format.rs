//! Closed vocabulary for the string `format` keyword.
use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    DateTime,
    Date,
    Time,
    Duration,
    Email,
    Hostname,
    Ipv4,
    Ipv6,
    Uri,
    UriReference,
    Uuid,
    Regex,
}

impl Format {
    pub const ALL: [Format; 12] = [
        Format::DateTime,
        Format::Date,
        Format::Time,
        Format::Duration,
        Format::Email,
        Format::Hostname,
        Format::Ipv4,
        Format::Ipv6,
        Format::Uri,
        Format::UriReference,
        Format::Uuid,
        Format::Regex,
    ];

    /// Canonical wire text.
    pub fn as_str(self) -> &'static str {
        match self {
            Format::DateTime     => "date-time",
            Format::Date         => "date",
            Format::Time         => "time",
            Format::Duration     => "duration",
            Format::Email        => "email",
            Format::Hostname     => "hostname",
            Format::Ipv4         => "ipv4",
            Format::Ipv6         => "ipv6",
            Format::Uri          => "uri",
            Format::UriReference => "uri-reference",
            Format::Uuid         => "uuid",
            Format::Regex        => "regex",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_time_wire_text() {
        assert_eq!(Format::DateTime.as_str(), "date-time");
        assert_eq!(Format::DateTime.to_string(), "date-time");
    }

    #[test]
    fn parse_is_inverse_of_as_str() {
        for f in Format::ALL {
            assert_eq!(f.as_str().parse::<Format>().unwrap(), f);
        }
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = "datetime".parse::<Format>().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownFormat(ref s) if s == "datetime"));
    }
}
