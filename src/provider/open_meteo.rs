//! [`SeriesProvider`] backed by the Open-Meteo historical archive API.

use crate::provider::error::ProviderError;
use crate::provider::series_provider::{SeriesProvider, SeriesQuery};
use crate::types::error::SeriesError;
use crate::types::time_series::TimeSeries;
use async_trait::async_trait;
use bon::Builder;
use chrono::{DateTime, FixedOffset};
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

pub const OPEN_METEO_ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Fetches hourly 2 m air temperature from the Open-Meteo archive.
///
/// Readings are requested as unix timestamps in the query's timezone; the
/// response's UTC offset is attached to every timestamp so they render in local time.
///
/// The archive reports a single `utc_offset_seconds` for the whole window. When the
/// window crosses a daylight saving change, the readings on the other side of it
/// render one hour off their local wall-clock time. The instants themselves, and so
/// their order and the statistics, are unaffected.
///
/// # Examples
///
/// ```
/// use tempstats::OpenMeteoProvider;
///
/// // Default endpoint and HTTP client.
/// let provider = OpenMeteoProvider::default();
///
/// // Custom endpoint, e.g. a self-hosted mirror.
/// let mirror = OpenMeteoProvider::builder()
///     .base_url("http://localhost:8080/v1/archive")
///     .build();
/// ```
#[derive(Debug, Clone, Builder)]
pub struct OpenMeteoProvider {
    #[builder(default)]
    client: Client,
    #[builder(into, default = OPEN_METEO_ARCHIVE_URL.to_string())]
    base_url: String,
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    utc_offset_seconds: i32,
    hourly: HourlyBlock,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    time: Vec<i64>,
    temperature_2m: Vec<Option<f64>>,
}

#[async_trait]
impl SeriesProvider for OpenMeteoProvider {
    async fn fetch_series(&self, query: &SeriesQuery) -> Result<TimeSeries, ProviderError> {
        let url = &self.base_url;
        info!(
            "Requesting hourly temperatures for ({}, {}) from {} to {}",
            query.location.0, query.location.1, query.start, query.end
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("latitude", query.location.0.to_string()),
                ("longitude", query.location.1.to_string()),
                ("start_date", query.start.format(DATE_FORMAT).to_string()),
                ("end_date", query.end.format(DATE_FORMAT).to_string()),
                ("hourly", "temperature_2m".to_string()),
                ("timeformat", "unixtime".to_string()),
                ("timezone", query.timezone.clone()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkRequest(url.clone(), e))?;

        let checked = response.error_for_status_ref().map(|_| ());
        if let Err(e) = checked {
            let status = response.status();
            let reason = error_reason(response).await;
            warn!("HTTP error for {}: {:?} ({:?})", url, e, reason);
            return Err(ProviderError::HttpStatus {
                url: url.clone(),
                status,
                reason,
                source: e,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ProviderError::NetworkRequest(url.clone(), e))?;

        let series = parse_archive_response(&body)?;
        info!("Received {} hourly readings", series.len());
        Ok(series)
    }
}

/// Error bodies look like `{"error": true, "reason": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiError {
    reason: String,
}

async fn error_reason(response: reqwest::Response) -> Option<String> {
    let body = response.bytes().await.ok()?;
    serde_json::from_slice::<ApiError>(&body)
        .ok()
        .map(|e| e.reason)
}

/// Parses an archive payload into a [`TimeSeries`].
///
/// Hours without a reading (`null`) are skipped. A payload with no readings left
/// is [`ProviderError::EmptySeries`].
pub(crate) fn parse_archive_response(body: &[u8]) -> Result<TimeSeries, ProviderError> {
    let payload: ArchiveResponse = serde_json::from_slice(body)?;
    let offset = FixedOffset::east_opt(payload.utc_offset_seconds)
        .ok_or(ProviderError::InvalidOffset(payload.utc_offset_seconds))?;

    let HourlyBlock {
        time,
        temperature_2m,
    } = payload.hourly;
    if time.len() != temperature_2m.len() {
        return Err(SeriesError::LengthMismatch {
            timestamps: time.len(),
            values: temperature_2m.len(),
        }
        .into());
    }

    let mut timestamps: Vec<DateTime<FixedOffset>> = Vec::with_capacity(time.len());
    let mut values = Vec::with_capacity(time.len());
    let mut missing = 0usize;
    for (seconds, reading) in time.into_iter().zip(temperature_2m) {
        let Some(value) = reading else {
            missing += 1;
            continue;
        };
        let instant =
            DateTime::from_timestamp(seconds, 0).ok_or(ProviderError::InvalidTimestamp(seconds))?;
        timestamps.push(instant.with_timezone(&offset));
        values.push(value);
    }

    if missing > 0 {
        warn!("Skipped {} hours without a temperature reading", missing);
    }

    let series = TimeSeries::new(timestamps, values)?;
    if series.is_empty() {
        return Err(ProviderError::EmptySeries);
    }
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;
    use crate::types::request::LatLon;
    use chrono::{NaiveDate, SecondsFormat};
    use reqwest::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const PAYLOAD: &str = r#"{
        "latitude": -23.5,
        "longitude": -46.625,
        "utc_offset_seconds": -10800,
        "timezone": "America/Sao_Paulo",
        "hourly_units": {"time": "unixtime", "temperature_2m": "°C"},
        "hourly": {
            "time": [1704078000, 1704081600, 1704085200, 1704088800],
            "temperature_2m": [22.1, 21.8, null, 21.0]
        }
    }"#;

    #[test]
    fn test_parse_valid_response() {
        let series = parse_archive_response(PAYLOAD.as_bytes()).unwrap();

        assert_eq!(series.values(), &[22.1, 21.8, 21.0]);
        let rendered: Vec<String> = series
            .timestamps()
            .iter()
            .map(|ts| ts.to_rfc3339_opts(SecondsFormat::Secs, false))
            .collect();
        assert_eq!(
            rendered,
            [
                "2024-01-01T00:00:00-03:00",
                "2024-01-01T01:00:00-03:00",
                "2024-01-01T03:00:00-03:00",
            ]
        );
    }

    #[test]
    fn test_parse_all_null_is_empty() {
        let body = r#"{"utc_offset_seconds": 0, "hourly": {"time": [1704078000], "temperature_2m": [null]}}"#;
        assert!(matches!(
            parse_archive_response(body.as_bytes()),
            Err(ProviderError::EmptySeries)
        ));
    }

    #[test]
    fn test_parse_empty_arrays() {
        let body = r#"{"hourly": {"time": [], "temperature_2m": []}}"#;
        assert!(matches!(
            parse_archive_response(body.as_bytes()),
            Err(ProviderError::EmptySeries)
        ));
    }

    #[test]
    fn test_parse_malformed_json() {
        assert!(matches!(
            parse_archive_response(b"not json"),
            Err(ProviderError::MalformedPayload(_))
        ));
        // Error payloads from the API have no hourly block.
        let body = r#"{"error": true, "reason": "Parameter 'start_date' is out of allowed range"}"#;
        assert!(matches!(
            parse_archive_response(body.as_bytes()),
            Err(ProviderError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_parse_length_mismatch() {
        let body = r#"{"hourly": {"time": [1704078000, 1704081600], "temperature_2m": [20.0]}}"#;
        assert!(matches!(
            parse_archive_response(body.as_bytes()),
            Err(ProviderError::InvalidSeries(SeriesError::LengthMismatch {
                timestamps: 2,
                values: 1
            }))
        ));
    }

    #[test]
    fn test_parse_out_of_order_timestamps() {
        let body = r#"{"hourly": {"time": [1704081600, 1704078000], "temperature_2m": [20.0, 21.0]}}"#;
        assert!(matches!(
            parse_archive_response(body.as_bytes()),
            Err(ProviderError::InvalidSeries(SeriesError::NonIncreasing { .. }))
        ));
    }

    #[test]
    fn test_parse_invalid_offset() {
        let body = r#"{"utc_offset_seconds": 999999, "hourly": {"time": [1704078000], "temperature_2m": [20.0]}}"#;
        assert!(matches!(
            parse_archive_response(body.as_bytes()),
            Err(ProviderError::InvalidOffset(999999))
        ));
    }

    #[test]
    fn test_single_offset_across_dst_change() {
        // Readings around the end of Sao Paulo's 2018 daylight saving time.
        let body = r#"{"utc_offset_seconds": -7200, "hourly": {
            "time": [1518919200, 1518922800, 1518926400],
            "temperature_2m": [24.0, 23.5, 23.0]
        }}"#;
        let series = parse_archive_response(body.as_bytes()).unwrap();

        let seconds: Vec<i64> = series.timestamps().iter().map(|ts| ts.timestamp()).collect();
        assert_eq!(seconds, [1518919200, 1518922800, 1518926400]);
        assert!(series
            .timestamps()
            .iter()
            .all(|ts| ts.offset().local_minus_utc() == -7200));
    }

    /// Answers the first connection with `status_line` and `body`, and hands back
    /// the request line the client sent.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/archive", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 16 * 1024];
            let mut read = 0;
            loop {
                let n = socket.read(&mut buf[read..]).await.unwrap();
                read += n;
                if n == 0 || buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();

            let request = String::from_utf8_lossy(&buf[..read]).into_owned();
            request.lines().next().unwrap_or_default().to_string()
        });
        (url, handle)
    }

    fn query() -> SeriesQuery {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        SeriesQuery {
            location: LatLon(-23.5, -46.6),
            start: day,
            end: day,
            timezone: "America/Sao_Paulo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_sends_archive_query() {
        let body = r#"{"utc_offset_seconds": -10800, "hourly": {"time": [1704078000, 1704081600], "temperature_2m": [20.0, 21.0]}}"#;
        let (url, server) = serve_once("200 OK", body).await;
        let provider = OpenMeteoProvider::builder().base_url(url).build();

        let series = provider.fetch_series(&query()).await.unwrap();
        let request_line = server.await.unwrap();

        assert_eq!(series.values(), &[20.0, 21.0]);
        assert_eq!(
            request_line,
            "GET /v1/archive?latitude=-23.5&longitude=-46.6&start_date=2024-01-01\
             &end_date=2024-01-01&hourly=temperature_2m&timeformat=unixtime\
             &timezone=America%2FSao_Paulo HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_fetch_http_error_keeps_reason() {
        let body = r#"{"error": true, "reason": "Parameter 'start_date' is out of allowed range"}"#;
        let (url, server) = serve_once("400 Bad Request", body).await;
        let provider = OpenMeteoProvider::builder().base_url(url.as_str()).build();

        let err = provider.fetch_series(&query()).await.unwrap_err();
        server.await.unwrap();

        match &err {
            ProviderError::HttpStatus {
                url: failed_url,
                status,
                reason,
                ..
            } => {
                assert_eq!(failed_url, &url);
                assert_eq!(*status, StatusCode::BAD_REQUEST);
                assert_eq!(
                    reason.as_deref(),
                    Some("Parameter 'start_date' is out of allowed range")
                );
            }
            other => panic!("expected an HTTP status error, got {:?}", other),
        }
        assert!(err
            .to_string()
            .ends_with("status 400 Bad Request: Parameter 'start_date' is out of allowed range"));
        assert_eq!(AnalyzerError::from(err).status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_fetch_http_error_without_reason() {
        let (url, server) = serve_once("503 Service Unavailable", "upstream down").await;
        let provider = OpenMeteoProvider::builder().base_url(url).build();

        let err = provider.fetch_series(&query()).await.unwrap_err();
        server.await.unwrap();

        assert!(matches!(
            &err,
            ProviderError::HttpStatus { status, reason: None, .. }
                if *status == StatusCode::SERVICE_UNAVAILABLE
        ));
        assert!(err.to_string().ends_with("status 503 Service Unavailable"));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/archive", listener.local_addr().unwrap());
        drop(listener);
        let provider = OpenMeteoProvider::builder().base_url(url.as_str()).build();

        let err = provider.fetch_series(&query()).await.unwrap_err();

        assert!(matches!(&err, ProviderError::NetworkRequest(failed_url, _) if failed_url == &url));
        assert_eq!(AnalyzerError::from(err).status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_builder_defaults() {
        let provider = OpenMeteoProvider::default();
        assert_eq!(provider.base_url, OPEN_METEO_ARCHIVE_URL);

        let custom = OpenMeteoProvider::builder()
            .base_url("http://127.0.0.1:9/archive")
            .build();
        assert_eq!(custom.base_url, "http://127.0.0.1:9/archive");
    }
}
