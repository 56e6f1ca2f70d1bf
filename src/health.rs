//! The `/health` endpoint.
//!
//! Gotenberg answers `200` when every module is up and `503` with the same
//! JSON body when one is down, so both statuses are decoded into a
//! [`HealthStatus`] rather than treated as failures.

use crate::client::GotenbergClient;
use crate::error::{GotenbergError, Result};
use crate::response::RawResponse;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

const HEALTH_ENDPOINT: &str = "health";

/// Keys the LibreOffice module has been reported under, newest first.
const LIBREOFFICE_KEYS: [&str; 2] = ["libreoffice", "uno"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Up,
    Down,
    #[serde(other)]
    Unknown,
}

/// State of one server module at its last check.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleHealth {
    pub status: ServiceStatus,
    pub timestamp: Option<DateTime<Utc>>,
}

impl ModuleHealth {
    pub fn is_up(&self) -> bool {
        self.status == ServiceStatus::Up
    }
}

/// Decoded health report.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub overall: ServiceStatus,
    pub chromium: Option<ModuleHealth>,
    pub libreoffice: Option<ModuleHealth>,
}

#[derive(Deserialize)]
struct HealthBody {
    status: ServiceStatus,
    #[serde(default)]
    details: Map<String, Value>,
}

#[derive(Deserialize)]
struct ModuleBody {
    status: ServiceStatus,
    #[serde(default)]
    timestamp: Option<String>,
}

impl HealthStatus {
    pub fn is_up(&self) -> bool {
        self.overall == ServiceStatus::Up
    }

    /// Decode a health JSON document.
    pub fn from_json(body: &[u8]) -> Result<Self> {
        let parsed: HealthBody = serde_json::from_slice(body)
            .map_err(|e| GotenbergError::InvalidResponse(format!("health body: {e}")))?;

        let chromium = module(&parsed.details, "chromium")?;
        let mut libreoffice = None;
        for key in LIBREOFFICE_KEYS {
            if let Some(m) = module(&parsed.details, key)? {
                libreoffice = Some(m);
                break;
            }
        }

        Ok(Self {
            overall: parsed.status,
            chromium,
            libreoffice,
        })
    }
}

fn module(details: &Map<String, Value>, key: &str) -> Result<Option<ModuleHealth>> {
    let Some(value) = details.get(key) else {
        return Ok(None);
    };
    let body: ModuleBody = serde_json::from_value(value.clone())
        .map_err(|e| GotenbergError::InvalidResponse(format!("health module '{key}': {e}")))?;
    let timestamp = match body.timestamp.as_deref() {
        Some(raw) => {
            let parsed = parse_timestamp(raw);
            if parsed.is_none() {
                warn!("Unparseable {} health timestamp: {}", key, raw);
            }
            parsed
        }
        None => None,
    };
    Ok(Some(ModuleHealth {
        status: body.status,
        timestamp,
    }))
}

/// RFC 3339 first; zone-less ISO 8601 is read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Factory for the health check.
#[derive(Debug, Clone, Copy)]
pub struct HealthApi<'a> {
    client: &'a GotenbergClient,
}

impl<'a> HealthApi<'a> {
    pub(crate) fn new(client: &'a GotenbergClient) -> Self {
        Self { client }
    }

    /// GET `/health`.
    ///
    /// A `503` is a report of a down module, not an error. Any other
    /// non-success status is returned as [`GotenbergError::HttpStatus`].
    pub async fn check(&self) -> Result<HealthStatus> {
        let transport = self.client.transport();
        let url = transport.url(HEALTH_ENDPOINT)?;
        debug!("GET {}", url);

        let mut request = transport.http.get(url).header(ACCEPT, "application/json");
        if let Some((user, password)) = &transport.auth {
            request = request.basic_auth(user, password.as_ref());
        }

        let raw = RawResponse::read(request.send().await?).await?;
        let status = raw.status();
        if !status.is_success() && status != StatusCode::SERVICE_UNAVAILABLE {
            return Err(GotenbergError::http_status(raw));
        }

        let health = HealthStatus::from_json(raw.body())?;
        if !health.is_up() {
            warn!("Gotenberg reports {:?}", health.overall);
        }
        Ok(health)
    }

    pub fn check_blocking(&self) -> Result<HealthStatus> {
        self.client.transport().block_on(self.check())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn decodes_current_shape() {
        let body = br#"{
            "status": "up",
            "details": {
                "chromium": {"status": "up", "timestamp": "2023-10-04T14:36:41.906512542Z"},
                "libreoffice": {"status": "up", "timestamp": "2023-10-04T14:36:41.906741924Z"}
            }
        }"#;
        let health = HealthStatus::from_json(body).unwrap();
        assert!(health.is_up());
        let chromium = health.chromium.unwrap();
        assert!(chromium.is_up());
        let ts = chromium.timestamp.unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2023, 10, 4));
        assert_eq!((ts.hour(), ts.minute(), ts.second()), (14, 36, 41));
        assert!(health.libreoffice.is_some());
    }

    #[test]
    fn legacy_uno_key_fills_libreoffice() {
        let body = br#"{"status":"down","details":{"uno":{"status":"down","timestamp":"2023-01-02 03:04:05"}}}"#;
        let health = HealthStatus::from_json(body).unwrap();
        assert_eq!(health.overall, ServiceStatus::Down);
        assert!(health.chromium.is_none());
        let office = health.libreoffice.unwrap();
        assert_eq!(office.status, ServiceStatus::Down);
        assert_eq!(office.timestamp.unwrap().hour(), 3);
    }

    #[test]
    fn offset_timestamps_normalized_to_utc() {
        let ts = parse_timestamp("2024-06-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.hour(), 10);
    }

    #[test]
    fn unknown_status_and_bad_timestamp_are_tolerated() {
        let body = br#"{"status":"degraded","details":{"chromium":{"status":"up","timestamp":"yesterday"}}}"#;
        let health = HealthStatus::from_json(body).unwrap();
        assert_eq!(health.overall, ServiceStatus::Unknown);
        assert!(health.chromium.unwrap().timestamp.is_none());
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        assert!(matches!(
            HealthStatus::from_json(b"<html>"),
            Err(GotenbergError::InvalidResponse(_))
        ));
    }
}
