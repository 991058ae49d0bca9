//! # Rates Client
//!
//! HTTP exchange rate providers. Both upstreams answer with a JSON body of
//! the shape `{ "rates": { "<CODE>": <number> } }`:
//!
//! - [`FrankfurterProvider`]: `GET <url>?from=<FROM>&to=<TO>` (primary)
//! - [`OpenErApiProvider`]: `GET <url>/<FROM>`, the full table anchored at `FROM`

use remit_types::{RateError, RatePair, RateProvider};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

pub const FRANKFURTER_URL: &str = "https://api.frankfurter.app/latest";
pub const OPEN_ER_API_URL: &str = "https://open.er-api.com/v6/latest";

/// Primary provider: converts between two named currencies.
pub struct FrankfurterProvider {
    base_url: String,
    http: Client,
}

impl FrankfurterProvider {
    pub const NAME: &'static str = "frankfurter";

    /// Creates a provider against `base_url` (the `latest` endpoint).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Shares an existing connection pool.
    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new(FRANKFURTER_URL)
    }
}

#[async_trait::async_trait]
impl RateProvider for FrankfurterProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_rate(&self, pair: &RatePair) -> Result<f64, RateError> {
        let req = self
            .http
            .get(&self.base_url)
            .query(&[("from", pair.from.as_str()), ("to", pair.to.as_str())]);
        let body = fetch_json(Self::NAME, req).await?;
        extract_rate(Self::NAME, &body, pair)
    }
}

/// Secondary provider: full rate table anchored at the source currency.
pub struct OpenErApiProvider {
    base_url: String,
    http: Client,
}

impl OpenErApiProvider {
    pub const NAME: &'static str = "open-er-api";

    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    fn table_url(&self, pair: &RatePair) -> Result<Url, RateError> {
        let url_error = |message: String| RateError::Http {
            provider: Self::NAME.to_string(),
            message,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| url_error(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| url_error(format!("cannot append path to {}", self.base_url)))?
            .pop_if_empty()
            .push(pair.from.as_str());
        Ok(url)
    }
}

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new(OPEN_ER_API_URL)
    }
}

#[async_trait::async_trait]
impl RateProvider for OpenErApiProvider {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_rate(&self, pair: &RatePair) -> Result<f64, RateError> {
        let url = self.table_url(pair)?;
        let body = fetch_json(Self::NAME, self.http.get(url)).await?;
        extract_rate(Self::NAME, &body, pair)
    }
}

async fn fetch_json(provider: &str, req: reqwest::RequestBuilder) -> Result<Value, RateError> {
    let http_err = |e: reqwest::Error| RateError::Http {
        provider: provider.to_string(),
        message: e.to_string(),
    };

    let resp = req.send().await.map_err(http_err)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(RateError::Status {
            provider: provider.to_string(),
            status: status.as_u16(),
        });
    }

    let body = resp.text().await.map_err(http_err)?;
    debug!(provider, bytes = body.len(), "Received rate response");
    serde_json::from_str(&body).map_err(|e| RateError::MalformedResponse {
        provider: provider.to_string(),
        reason: e.to_string(),
    })
}

/// Pulls `rates[<to>]` out of a provider response.
fn extract_rate(provider: &str, body: &Value, pair: &RatePair) -> Result<f64, RateError> {
    let rates = body
        .get("rates")
        .filter(|rates| rates.is_object())
        .ok_or_else(|| RateError::MalformedResponse {
            provider: provider.to_string(),
            reason: "missing `rates` object".into(),
        })?;

    match rates.get(pair.to.as_str()) {
        None => Err(RateError::MissingRate {
            provider: provider.to_string(),
            pair: pair.clone(),
        }),
        Some(value) => value.as_f64().ok_or_else(|| RateError::MalformedResponse {
            provider: provider.to_string(),
            reason: format!("rate for {} is not a number: {}", pair.to, value),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn pair(from: &str, to: &str) -> RatePair {
        RatePair::parse(from, to).unwrap()
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let provider = FrankfurterProvider::new("http://localhost:8080/latest/");
        assert_eq!(provider.base_url, "http://localhost:8080/latest");
    }

    #[test]
    fn test_table_url_appends_code() {
        let provider = OpenErApiProvider::new("http://localhost:8080/v6/latest");
        let url = provider.table_url(&pair("usd", "INR")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/v6/latest/USD");
    }

    #[test]
    fn test_bad_table_url_is_http_error() {
        for base in ["not a url", "mailto:rates@example.com"] {
            let provider = OpenErApiProvider::new(base);
            match provider.table_url(&pair("USD", "INR")) {
                Err(RateError::Http { provider, .. }) => assert_eq!(provider, "open-er-api"),
                other => panic!("unexpected result for {base}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_extract_rate_variants() {
        let p = pair("USD", "INR");
        assert_eq!(
            extract_rate("t", &json!({"rates": {"INR": 88.3}}), &p),
            Ok(88.3)
        );
        assert!(matches!(
            extract_rate("t", &json!({"amount": 1.0}), &p),
            Err(RateError::MalformedResponse { .. })
        ));
        assert!(matches!(
            extract_rate("t", &json!({"rates": {"EUR": 0.9}}), &p),
            Err(RateError::MissingRate { .. })
        ));
        assert!(matches!(
            extract_rate("t", &json!({"rates": {"INR": "88.3"}}), &p),
            Err(RateError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_frankfurter_queries_pair() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "INR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "amount": 1.0,
                "base": "USD",
                "rates": { "INR": 88.21 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = FrankfurterProvider::new(format!("{}/latest", server.uri()));
        assert_eq!(provider.get_rate(&pair("USD", "INR")).await, Ok(88.21));
    }

    #[tokio::test]
    async fn test_frankfurter_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/latest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let provider = FrankfurterProvider::new(format!("{}/latest", server.uri()));
        assert!(matches!(
            provider.get_rate(&pair("USD", "INR")).await,
            Err(RateError::MalformedResponse { .. })
        ));
    }

    #[tokio::test]
    async fn test_open_er_api_reads_table() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "result": "success",
                "base_code": "EUR",
                "rates": { "EUR": 1, "INR": 95.62, "USD": 1.08 }
            })))
            .mount(&server)
            .await;

        let provider = OpenErApiProvider::new(format!("{}/v6/latest", server.uri()));
        assert_eq!(provider.get_rate(&pair("EUR", "INR")).await, Ok(95.62));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let provider = OpenErApiProvider::new(format!("{}/v6/latest", server.uri()));
        assert_eq!(
            provider.get_rate(&pair("GBP", "INR")).await,
            Err(RateError::Status {
                provider: OpenErApiProvider::NAME.into(),
                status: 503
            })
        );
    }
}
