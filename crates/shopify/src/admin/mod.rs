//! Shopify Admin API GraphQL client with access-token authentication.
//!
//! Every operation goes through [`AdminClient::execute`], which sends the
//! request once per attempt and lets [`call_with_retry`] re-issue it while
//! Shopify reports throttling.

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, QueryBody};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::ShopifyAdminConfig;
use crate::retry::{RetryPolicy, call_with_retry};
use crate::{AdminShopifyError, GraphQLError, GraphQLErrorLocation};

mod conversions;
mod inventory;
mod media;
mod products;
mod queries;

/// Request timeout for a single Admin API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest response body kept in an `AdminShopifyError::Status`.
const MAX_ERROR_BODY: usize = 500;

/// Shopify Admin API GraphQL client.
///
/// Cheap to clone; clones share one HTTP connection pool.
///
/// # Security
///
/// This client holds an Admin API access token with HIGH PRIVILEGE access
/// to the store. The token is only ever written to the request header.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    endpoint: Url,
    access_token: String,
    retry: RetryPolicy,
}

impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("access_token", &"[REDACTED]")
            .field("retry", &self.inner.retry)
            .finish()
    }
}

/// GraphQL response wrapper.
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLErrorResponse>>,
    extensions: Option<ResponseExtensions>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorResponse {
    message: String,
    #[serde(default)]
    locations: Vec<GraphQLErrorLocationResponse>,
    #[serde(default)]
    path: Vec<serde_json::Value>,
    extensions: Option<ErrorExtensions>,
}

#[derive(Debug, Deserialize)]
struct GraphQLErrorLocationResponse {
    line: i64,
    column: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorExtensions {
    code: Option<String>,
    /// Milliseconds; Shopify has sent both numbers and numeric strings.
    retry_after: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResponseExtensions {
    cost: Option<QueryCost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryCost {
    requested_query_cost: Option<f64>,
    throttle_status: Option<ThrottleStatus>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThrottleStatus {
    currently_available: f64,
    restore_rate: f64,
}

impl AdminClient {
    /// Create a new Admin API client.
    ///
    /// # Arguments
    ///
    /// * `config` - Shopify Admin API configuration
    /// * `retry` - Throttle retry policy applied to every call
    ///
    /// # Errors
    ///
    /// Returns `AdminShopifyError::Config` if the endpoint cannot be built and
    /// `AdminShopifyError::Http` if the HTTP client fails to initialize.
    pub fn new(config: &ShopifyAdminConfig, retry: RetryPolicy) -> Result<Self, AdminShopifyError> {
        let endpoint = config
            .graphql_endpoint()
            .map_err(|e| AdminShopifyError::Config(e.to_string()))?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("catalog-sync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                endpoint,
                access_token: config.access_token().to_string(),
                retry,
            }),
        })
    }

    /// The GraphQL endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    // =========================================================================
    // GraphQL Execution
    // =========================================================================

    /// Execute a GraphQL operation, retrying while Shopify throttles it.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        let body = Q::build_query(variables);
        let operation = body.operation_name;

        call_with_retry(&self.inner.retry, operation, || {
            self.execute_once::<Q>(&body)
        })
        .await
        .map_err(AdminShopifyError::from)
    }

    /// Send one attempt of a GraphQL operation.
    async fn execute_once<Q: GraphQLQuery>(
        &self,
        body: &QueryBody<Q::Variables>,
    ) -> Result<Q::ResponseData, AdminShopifyError>
    where
        Q::ResponseData: DeserializeOwned,
    {
        debug!(operation = body.operation_name, "Sending Admin API request");

        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header("X-Shopify-Access-Token", &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after_header);
            return Err(AdminShopifyError::Throttled { retry_after });
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AdminShopifyError::Unauthorized(
                "Invalid or expired access token".to_string(),
            ));
        }

        let text = response.text().await?;

        if !status.is_success() {
            return Err(AdminShopifyError::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let graphql_response: GraphQLResponse<Q::ResponseData> = serde_json::from_str(&text)?;

        // Check for GraphQL errors
        if let Some(errors) = graphql_response.errors
            && !errors.is_empty()
        {
            let suggested = throttle_wait(&errors, graphql_response.extensions.as_ref());
            let converted_errors: Vec<GraphQLError> =
                errors.into_iter().map(convert_graphql_error).collect();

            if converted_errors.iter().any(GraphQLError::is_throttled) {
                return Err(AdminShopifyError::Throttled {
                    retry_after: suggested,
                });
            }
            return Err(AdminShopifyError::GraphQL(converted_errors));
        }

        graphql_response
            .data
            .ok_or_else(|| AdminShopifyError::GraphQL(vec![GraphQLError::client("No data in response")]))
    }
}

fn convert_graphql_error(e: GraphQLErrorResponse) -> GraphQLError {
    GraphQLError {
        message: e.message,
        code: e.extensions.and_then(|x| x.code),
        locations: e
            .locations
            .into_iter()
            .map(|l| GraphQLErrorLocation {
                line: l.line,
                column: l.column,
            })
            .collect(),
        path: e.path,
    }
}

/// Parse a `Retry-After` header given in (possibly fractional) seconds.
fn parse_retry_after_header(raw: &str) -> Option<Duration> {
    let secs: f64 = raw.trim().parse().ok()?;
    Duration::try_from_secs_f64(secs).ok()
}

/// Suggested wait for a `THROTTLED` response.
///
/// Prefers an explicit `retryAfter` (milliseconds) on the error, then the
/// time the bucket needs to refill enough for the requested cost.
fn throttle_wait(
    errors: &[GraphQLErrorResponse],
    extensions: Option<&ResponseExtensions>,
) -> Option<Duration> {
    let explicit = errors
        .iter()
        .filter_map(|e| e.extensions.as_ref()?.retry_after.as_ref())
        .find_map(retry_after_millis);

    explicit.or_else(|| extensions.and_then(|x| x.cost.as_ref()).and_then(refill_wait))
}

fn retry_after_millis(value: &serde_json::Value) -> Option<Duration> {
    let millis = match value {
        serde_json::Value::Number(n) => n.as_f64()?,
        serde_json::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    Duration::try_from_secs_f64(millis / 1000.0).ok()
}

fn refill_wait(cost: &QueryCost) -> Option<Duration> {
    let requested = cost.requested_query_cost?;
    let status = cost.throttle_status.as_ref()?;
    if status.restore_rate <= 0.0 {
        return None;
    }
    let deficit = (requested - status.currently_available).max(0.0);
    let secs = (deficit / status.restore_rate).ceil().max(1.0);
    Duration::try_from_secs_f64(secs).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn throttled_response(body: serde_json::Value) -> GraphQLResponse<serde_json::Value> {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_retry_after_header_accepts_fractions() {
        assert_eq!(parse_retry_after_header("2"), Some(Duration::from_secs(2)));
        assert_eq!(
            parse_retry_after_header(" 1.5 "),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(parse_retry_after_header("soon"), None);
        assert_eq!(parse_retry_after_header("-1"), None);
    }

    #[test]
    fn test_throttle_wait_prefers_explicit_retry_after() {
        let response = throttled_response(serde_json::json!({
            "errors": [{
                "message": "Throttled",
                "extensions": { "code": "THROTTLED", "retryAfter": "2500" }
            }],
            "extensions": {
                "cost": {
                    "requestedQueryCost": 100,
                    "throttleStatus": { "currentlyAvailable": 0, "restoreRate": 50 }
                }
            }
        }));
        let errors = response.errors.unwrap();
        assert_eq!(
            throttle_wait(&errors, response.extensions.as_ref()),
            Some(Duration::from_millis(2500))
        );
    }

    #[test]
    fn test_throttle_wait_derives_from_cost() {
        let response = throttled_response(serde_json::json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }],
            "extensions": {
                "cost": {
                    "requestedQueryCost": 252,
                    "actualQueryCost": null,
                    "throttleStatus": {
                        "maximumAvailable": 2000.0,
                        "currentlyAvailable": 40,
                        "restoreRate": 100.0
                    }
                }
            }
        }));
        let errors = response.errors.unwrap();
        assert_eq!(
            throttle_wait(&errors, response.extensions.as_ref()),
            Some(Duration::from_secs(3))
        );
    }

    #[test]
    fn test_throttle_wait_absent_without_hints() {
        let response = throttled_response(serde_json::json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        }));
        let errors = response.errors.unwrap();
        assert_eq!(throttle_wait(&errors, None), None);
    }

    #[test]
    fn test_refill_wait_is_at_least_one_second() {
        let cost = QueryCost {
            requested_query_cost: Some(10.0),
            throttle_status: Some(ThrottleStatus {
                currently_available: 50.0,
                restore_rate: 50.0,
            }),
        };
        assert_eq!(refill_wait(&cost), Some(Duration::from_secs(1)));
    }

    #[test]
    fn test_error_code_is_kept() {
        let response = throttled_response(serde_json::json!({
            "errors": [{
                "message": "Throttled",
                "locations": [{ "line": 2, "column": 3 }],
                "extensions": { "code": "THROTTLED" }
            }]
        }));
        let err = convert_graphql_error(response.errors.unwrap().into_iter().next().unwrap());
        assert!(err.is_throttled());
        assert_eq!(err.locations.first().map(|l| l.line), Some(2));
    }
}
