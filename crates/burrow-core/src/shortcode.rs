use crate::base62::CODE_LENGTH;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;

const MIN_LENGTH: usize = 3;
const MAX_LENGTH: usize = 32;

/// Path segments owned by the HTTP surface. An alias equal to one of these
/// would be shadowed by the route and never resolve.
const RESERVED: &[&str] = &["api", "health"];

/// A validated short code identifier for a shortened URL.
///
/// Any code is 3-32 characters of `[a-zA-Z0-9_-]`. Generated codes are the
/// 7-character base62 subset of that grammar. Codes up to 23 bytes are stored
/// inline, so building one never touches the heap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShortCode(SmolStr);

impl ShortCode {
    /// Builds a code from generator output.
    ///
    /// The digits come from [`crate::base62::ALPHABET`], so no validation
    /// is needed.
    pub fn from_digits(digits: [u8; CODE_LENGTH]) -> Self {
        Self(digits.iter().map(|&b| char::from(b)).collect())
    }

    /// Parses a code received from a caller, e.g. a redirect path segment.
    pub fn parse(code: &str) -> Result<Self> {
        Self::validate(code)?;
        Ok(Self(SmolStr::new(code)))
    }

    /// Parses a caller-chosen alias.
    ///
    /// Surrounding whitespace is ignored. On top of the [`ShortCode::parse`]
    /// grammar, aliases may not shadow a reserved route segment.
    pub fn custom(alias: &str) -> Result<Self> {
        let alias = alias.trim();
        Self::validate(alias)?;

        if RESERVED
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(alias))
        {
            return Err(CoreError::InvalidShortCode(format!(
                "'{alias}' is reserved"
            )));
        }

        Ok(Self(SmolStr::new(alias)))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from a trusted store.
    pub fn new_unchecked(code: impl AsRef<str>) -> Self {
        Self(SmolStr::new(code.as_ref()))
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<()> {
        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(CoreError::InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        if !code
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || c == b'-' || c == b'_')
        {
            return Err(CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCode").field(&self.0.as_str()).finish()
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for ShortCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ShortCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        ShortCode::parse(&raw).map_err(serde::de::Error::custom)
    }
}
