use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.sunrise-sunset.org/json";

/// Rendered as `hh:mm:ss AM/PM`.
const TIME_FORMAT: &str = "%I:%M:%S %p";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MomentKind {
    Sunrise,
    Sunset,
}

impl fmt::Display for MomentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MomentKind::Sunrise => f.write_str("sunrise"),
            MomentKind::Sunset => f.write_str("sunset"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub kind: MomentKind,
}

/// Moment already converted into the target zone and formatted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalizedTime(pub String);

impl fmt::Display for LocalizedTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum ResolverError {
    #[error("upstream time API failed: {0}")]
    Upstream(String),
    #[error("unexpected upstream payload: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ResolverError {
    fn from(err: reqwest::Error) -> Self {
        ResolverError::Upstream(err.to_string())
    }
}

#[async_trait]
pub trait TimeResolver: Send + Sync {
    async fn resolve(&self, query: TimeQuery) -> Result<LocalizedTime, ResolverError>;
}

#[derive(Deserialize)]
struct ApiResponse {
    results: ApiResults,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct ApiResults {
    sunrise: String,
    sunset: String,
}

/// Client for the sunrise-sunset.org JSON API.
pub struct SunriseSunsetClient {
    http: reqwest::Client,
    api_url: String,
    zone: Tz,
}

impl SunriseSunsetClient {
    pub fn new(api_url: impl Into<String>, timeout: Duration, zone: Tz) -> Result<Self, ResolverError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            zone,
        })
    }
}

#[async_trait]
impl TimeResolver for SunriseSunsetClient {
    async fn resolve(&self, query: TimeQuery) -> Result<LocalizedTime, ResolverError> {
        let lat = query.latitude.to_string();
        let lng = query.longitude.to_string();
        let res = self
            .http
            .get(&self.api_url)
            .query(&[("lat", lat.as_str()), ("lng", lng.as_str()), ("formatted", "1")])
            .send()
            .await?
            .error_for_status()?;

        let payload: ApiResponse = res.json().await.map_err(|e| {
            if e.is_decode() {
                ResolverError::Parse(e.to_string())
            } else {
                ResolverError::Upstream(e.to_string())
            }
        })?;

        if let Some(status) = payload.status.as_deref() {
            if status != "OK" {
                return Err(ResolverError::Upstream(format!("status {status}")));
            }
        }

        let raw = match query.kind {
            MomentKind::Sunrise => payload.results.sunrise,
            MomentKind::Sunset => payload.results.sunset,
        };
        debug!("upstream {} for ({lat}, {lng}): {raw}", query.kind);

        let instant = parse_timestamp(&raw, Utc::now().date_naive())?;
        Ok(localize(instant, &self.zone))
    }
}

/// Parses an upstream timestamp into an absolute instant.
///
/// Offset-bearing forms keep their own offset. A bare clock time such as
/// `7:27:02 AM` is what the API sends with `formatted=1`; it is UTC on `today`.
pub fn parse_timestamp(raw: &str, today: NaiveDate) -> Result<DateTime<FixedOffset>, ResolverError> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Ok(dt);
    }
    for fmt in ["%Y-%m-%d %H:%M:%S %z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    for fmt in ["%I:%M:%S %p", "%I:%M %p", "%H:%M:%S"] {
        if let Ok(time) = NaiveTime::parse_from_str(raw, fmt) {
            return Ok(Utc.from_utc_datetime(&today.and_time(time)).fixed_offset());
        }
    }

    Err(ResolverError::Parse(format!("unrecognized timestamp {raw:?}")))
}

pub fn localize(instant: DateTime<FixedOffset>, zone: &Tz) -> LocalizedTime {
    LocalizedTime(instant.with_timezone(zone).format(TIME_FORMAT).to_string())
}
