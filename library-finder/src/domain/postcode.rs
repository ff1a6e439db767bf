//! UK postcode type.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

/// Error returned when parsing a malformed postcode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid postcode: {input:?}")]
pub struct InvalidPostcode {
    input: String,
}

/// Postcode format: one or two area letters, a district digit optionally
/// followed by a digit or letter, an optional space, then the inward code.
fn postcode_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Literal pattern; compiling it cannot fail
        Regex::new(r"^[A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}$").unwrap()
    })
}

/// A UK postcode that has passed the format check.
///
/// Input is trimmed and uppercased before matching, so `"sw1a 1aa"` is
/// accepted. The format check says nothing about whether the postcode
/// exists; that is the geocoder's job.
///
/// # Examples
///
/// ```
/// use library_finder::domain::Postcode;
///
/// let pc = Postcode::parse(" sw1a 1aa ").unwrap();
/// assert_eq!(pc.as_str(), "SW1A 1AA");
/// assert_eq!(pc.compact(), "SW1A1AA");
///
/// assert!(Postcode::parse("ZZ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Postcode(String);

impl Postcode {
    pub fn parse(s: &str) -> Result<Self, InvalidPostcode> {
        let normalized = s.trim().to_uppercase();

        if !postcode_pattern().is_match(&normalized) {
            return Err(InvalidPostcode {
                input: s.to_string(),
            });
        }

        Ok(Postcode(normalized))
    }

    /// The postcode as entered, uppercased.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The postcode with spaces removed, for URLs and cache keys.
    pub fn compact(&self) -> String {
        self.0.replace(' ', "")
    }
}

impl fmt::Debug for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Postcode({})", self.0)
    }
}

impl fmt::Display for Postcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
