use burrow_core::{Origin, ShortCodeRecord};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenRequest {
    pub long_url: String,
    #[serde(default)]
    pub custom_alias: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    pub created_at: Timestamp,
    pub origin: Origin,
}

impl ShortenResponse {
    pub fn from_record(record: ShortCodeRecord, public_base_url: &str) -> Self {
        Self {
            short_url: record.code.to_url(public_base_url),
            short_code: record.code.to_string(),
            long_url: record.long_url,
            created_at: record.created_at,
            origin: record.origin,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub kind: String,
    pub message: String,
}
