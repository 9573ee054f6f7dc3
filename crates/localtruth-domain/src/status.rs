//! Status module - the verdict attached to a claim

use std::fmt;

/// Verdict on a claim
///
/// Derived once from the classifier output when the claim is created:
/// - Verified: the text was judged factual
/// - False: the text was judged to be misinformation
/// - Inconclusive: the classifier was not confident either way
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimStatus {
    /// Judged factual
    Verified,

    /// Judged to be misinformation
    False,

    /// Not enough confidence for either verdict
    Inconclusive,
}

impl ClaimStatus {
    /// Get the status name as stored and displayed
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimStatus::Verified => "Verified",
            ClaimStatus::False => "False",
            ClaimStatus::Inconclusive => "Inconclusive",
        }
    }

    /// Parse a status from a string, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "verified" => Some(ClaimStatus::Verified),
            "false" => Some(ClaimStatus::False),
            "inconclusive" => Some(ClaimStatus::Inconclusive),
            _ => None,
        }
    }

    /// All statuses, in display order
    pub fn all() -> [ClaimStatus; 3] {
        [ClaimStatus::Verified, ClaimStatus::False, ClaimStatus::Inconclusive]
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ClaimStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid claim status: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_roundtrip() {
        for status in ClaimStatus::all() {
            assert_eq!(ClaimStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("FALSE".parse::<ClaimStatus>(), Ok(ClaimStatus::False));
        assert_eq!("verified".parse::<ClaimStatus>(), Ok(ClaimStatus::Verified));
        assert!("trending".parse::<ClaimStatus>().is_err());
    }
}
