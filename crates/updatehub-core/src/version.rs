//! Validated dotted-integer version strings and their ordering.
//!
//! A version string is a sequence of non-negative integers separated by `.`
//! (`1`, `1.0.3`, `2.10.0.1`, ...). Versions of unequal segment counts are
//! compared by zero-padding the shorter to the longer's length, so `"1.0"`
//! and `"1"` are equal and `"2"` is greater than `"1.9.9"`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::UpdateError;

/// A validated version string.
///
/// The original text is preserved (no normalization), so a version read from
/// a client round-trips to storage byte-for-byte. Equality and ordering work
/// over the parsed segments with zero-padding.
///
/// # Examples
///
/// ```
/// use updatehub_core::version::Version;
///
/// let a: Version = "1.2".parse().unwrap();
/// let b: Version = "1.2.0".parse().unwrap();
/// assert_eq!(a, b);
///
/// let newer: Version = "2".parse().unwrap();
/// let older: Version = "1.9.9".parse().unwrap();
/// assert!(newer > older);
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    text: String,
    segments: Vec<u64>,
}

impl Version {
    /// The version exactly as the client supplied it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Compare two versions segment-by-segment, left to right, zero-padding
    /// the shorter one.
    #[must_use]
    pub fn compare(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl FromStr for Version {
    type Err = UpdateError;

    /// Parse and validate a version string.
    ///
    /// Every `.`-separated segment must be a non-empty run of ASCII digits
    /// that fits in a `u64`. No other characters are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || UpdateError::InvalidVersionFormat {
            input: s.to_owned(),
        };

        if s.is_empty() {
            return Err(invalid());
        }

        let mut segments = Vec::new();
        for segment in s.split('.') {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            segments.push(segment.parse::<u64>().map_err(|_| invalid())?);
        }

        Ok(Self {
            text: s.to_owned(),
            segments,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap_or_else(|e| panic!("{s} should parse: {e}"))
    }

    #[test]
    fn test_should_accept_valid_version_strings() {
        for s in ["0", "1", "1.0", "1.0.3", "10.20.30.40", "01.2"] {
            assert!(s.parse::<Version>().is_ok(), "{s} should be valid");
        }
    }

    #[test]
    fn test_should_reject_malformed_version_strings() {
        for s in ["", ".", "1.", ".1", "1..2", "1.a", "a.1", "1.0-beta", " 1.0", "1.0 ", "-1"] {
            assert!(
                matches!(
                    s.parse::<Version>(),
                    Err(UpdateError::InvalidVersionFormat { .. })
                ),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_should_preserve_original_text() {
        assert_eq!(v("1.0.3").as_str(), "1.0.3");
        assert_eq!(v("01.2").to_string(), "01.2");
    }

    #[test]
    fn test_should_treat_padded_versions_as_equal() {
        assert_eq!(v("1.0"), v("1"));
        assert_eq!(v("1.2.0"), v("1.2"));
        assert_eq!(v("1.2.0.0.0"), v("1.2"));
    }

    #[test]
    fn test_should_order_by_leftmost_differing_segment() {
        assert!(v("2") > v("1.9.9"));
        assert!(v("1.0.3") < v("1.0.10"));
        assert!(v("1.10") > v("1.9"));
        assert!(v("1.0.0.1") > v("1"));
    }

    #[test]
    fn test_should_compare_numerically_not_lexically() {
        // "10" < "9" as strings, but 10 > 9 as segments.
        assert!(v("0.10") > v("0.9"));
    }

    #[test]
    fn test_should_be_antisymmetric() {
        let pairs = [("1.2", "1.3"), ("2", "1.9.9"), ("1.0", "1"), ("1.0.3", "1.0.10")];
        for (a, b) in pairs {
            assert_eq!(v(a).compare(&v(b)), v(b).compare(&v(a)).reverse());
        }
    }

    #[test]
    fn test_should_be_reflexively_equal() {
        for s in ["1", "1.0.3", "10.0"] {
            assert_eq!(v(s).compare(&v(s)), Ordering::Equal);
        }
    }
}
