use chrono::{SecondsFormat, Utc};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub timestamp: String,
}

impl Health {
    /// Health snapshot stamped with the current UTC time.
    pub fn ok() -> Self {
        Self {
            status: "ok",
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}
