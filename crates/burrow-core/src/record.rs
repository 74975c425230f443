use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// How the code of a record was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Drawn from a code generator.
    Generated,
    /// Fixed by the caller as a custom alias.
    Custom,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Generated => "generated",
            Origin::Custom => "custom",
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Origin::Custom)
    }
}

/// An immutable short code to long URL mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortCodeRecord {
    pub code: ShortCode,
    pub long_url: String,
    pub created_at: Timestamp,
    pub origin: Origin,
}

impl ShortCodeRecord {
    /// Creates a record stamped with the current time.
    pub fn new(code: ShortCode, long_url: impl Into<String>, origin: Origin) -> Self {
        Self {
            code,
            long_url: long_url.into(),
            created_at: Timestamp::now(),
            origin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_serializes_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&Origin::Generated).unwrap(),
            "\"generated\""
        );
        assert_eq!(Origin::Custom.as_str(), "custom");
    }

    #[test]
    fn record_survives_json() {
        let record = ShortCodeRecord::new(
            ShortCode::parse("promo").unwrap(),
            "https://example.com/a",
            Origin::Custom,
        );

        let json = serde_json::to_string(&record).unwrap();
        let back: ShortCodeRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(back, record);
    }
}
