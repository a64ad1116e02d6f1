//! Shared HTTP plumbing for the service providers.
//!
//! Every provider builds its client the same way and classifies transport
//! failures the same way; only the mapping onto each provider's error enum
//! differs.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

/// Error type for provider construction failures.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// The configured base URL is not a valid absolute URL.
    #[error("invalid base URL {url:?}: {source}")]
    InvalidBaseUrl {
        /// Configured base URL.
        url: String,
        /// Parser detail.
        #[source]
        source: url::ParseError,
    },
}

/// Transport-level outcome of a failed JSON request.
#[derive(Debug)]
pub(crate) enum FetchError {
    Timeout,
    Status { status: u16, message: String },
    Network(String),
    Decode(String),
}

pub(crate) fn build_client(user_agent: &str, timeout: Duration) -> Result<Client, ProviderBuildError> {
    Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(ProviderBuildError::HttpClient)
}

/// Parse `base` once so request URLs can be derived without failing later.
pub(crate) fn parse_base(base: &str) -> Result<Url, ProviderBuildError> {
    let trimmed = base.trim_end_matches('/');
    Url::parse(&format!("{trimmed}/")).map_err(|source| ProviderBuildError::InvalidBaseUrl {
        url: base.to_owned(),
        source,
    })
}

/// Append path `segments` to `base`.
pub(crate) fn endpoint<'a>(base: &Url, segments: impl IntoIterator<Item = &'a str>) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// The URL without its query string, safe to log or embed in errors.
pub(crate) fn redacted(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_query(None);
    clean.to_string()
}

/// Messages are rendered without the request URL: callers attach a redacted
/// URL of their own, and query strings may carry credentials.
fn classify(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }
    let error = error.without_url();
    if let Some(status) = error.status() {
        return FetchError::Status {
            status: status.as_u16(),
            message: error.to_string(),
        };
    }
    if error.is_decode() {
        return FetchError::Decode(error.to_string());
    }
    FetchError::Network(error.to_string())
}

pub(crate) async fn get_json<T: DeserializeOwned>(client: &Client, url: Url) -> Result<T, FetchError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(classify)?
        .error_for_status()
        .map_err(classify)?;
    response.json().await.map_err(|err| {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Decode(err.without_url().to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://osrm.example.com")]
    #[case("http://osrm.example.com/")]
    fn endpoint_joins_segments(#[case] base: &str) {
        let base = parse_base(base).expect("valid base");
        let url = endpoint(&base, ["route", "v1", "driving"]);
        assert_eq!(url.as_str(), "http://osrm.example.com/route/v1/driving");
    }

    #[rstest]
    fn endpoint_keeps_base_path() {
        let base = parse_base("https://maps.example.com/maps/api").expect("valid base");
        let url = endpoint(&base, ["place", "autocomplete", "json"]);
        assert_eq!(
            url.as_str(),
            "https://maps.example.com/maps/api/place/autocomplete/json"
        );
    }

    #[rstest]
    fn rejects_relative_base() {
        let err = parse_base("not a url").expect_err("invalid");
        assert!(matches!(err, ProviderBuildError::InvalidBaseUrl { .. }));
    }

    #[rstest]
    fn redaction_drops_the_query() {
        let url = Url::parse("https://maps.example.com/place/details/json?key=secret")
            .expect("valid url");
        assert_eq!(redacted(&url), "https://maps.example.com/place/details/json");
    }
}
