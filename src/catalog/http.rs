//! HTTP utilities for catalog REST calls
//!
//! One request in, one classified result out. Nothing here retries; a failed
//! call is reported once and left to the caller.

use super::auth::PlatformCredentials;
use crate::error::{CatalogError, ParameterSource, Result};
use crate::model::FfdcResponse;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips non-printable characters
pub fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// What a request is for; used to attribute failures
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    pub operation: &'a str,
    pub user_id: &'a str,
}

/// HTTP client wrapper for catalog calls
#[derive(Clone)]
pub struct CatalogHttpClient {
    client: Client,
    credentials: Option<PlatformCredentials>,
}

impl CatalogHttpClient {
    /// Create a new HTTP client
    pub fn new(
        user_agent: &str,
        timeout: Duration,
        credentials: Option<PlatformCredentials>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CatalogError::property_server("newClient", None, format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, credentials })
    }

    /// Issue a read (no body)
    pub async fn get(&self, ctx: RequestContext<'_>, url: &Url) -> Result<Value> {
        tracing::debug!("GET {}", url);
        let request = self.client.get(url.clone());
        self.send(ctx, request).await
    }

    /// Issue a submission with a JSON body
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        ctx: RequestContext<'_>,
        url: &Url,
        body: &B,
    ) -> Result<Value> {
        tracing::debug!("POST {}", url);
        let request = self.client.post(url.clone()).json(body);
        self.send(ctx, request).await
    }

    async fn send(&self, ctx: RequestContext<'_>, request: RequestBuilder) -> Result<Value> {
        let request = match &self.credentials {
            Some(credentials) => credentials.apply(request),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!("{}: request failed: {}", ctx.operation, e);
            CatalogError::property_server(ctx.operation, None, format!("Failed to send request: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            CatalogError::property_server(
                ctx.operation,
                Some(status.as_u16()),
                format!("Failed to read response body: {}", e),
            )
        })?;

        let value = if body.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str::<Value>(&body) {
                Ok(value) => value,
                Err(_) if !status.is_success() => Value::Null,
                Err(e) => {
                    tracing::error!("{}: unparseable response: {}", ctx.operation, sanitize_for_log(&body));
                    return Err(CatalogError::property_server(
                        ctx.operation,
                        Some(status.as_u16()),
                        format!("Failed to parse response JSON: {}", e),
                    ));
                }
            }
        };

        let ffdc = if value.is_object() {
            serde_json::from_value::<FfdcResponse>(value.clone()).unwrap_or_default()
        } else {
            FfdcResponse::default()
        };

        if !status.is_success() || ffdc.is_failure() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::warn!(
                "{}: API error: {} - {}",
                ctx.operation,
                status,
                sanitize_for_log(&body)
            );
            let status = (!status.is_success()).then_some(status.as_u16());
            return Err(classify_failure(ctx, status, &ffdc));
        }

        Ok(value)
    }
}

/// Map a failed response onto the error taxonomy
///
/// The code embedded in the envelope wins over the HTTP status, since the
/// server may answer 200 with a failure inside.
pub fn classify_failure(ctx: RequestContext<'_>, status: Option<u16>, ffdc: &FfdcResponse) -> CatalogError {
    let code = ffdc
        .related_http_code
        .filter(|code| *code != 200)
        .or(status);
    let class_name = ffdc.exception_class_name.as_deref().unwrap_or("");
    let message = ffdc.message();

    if class_name.ends_with("UserNotAuthorizedException") || matches!(code, Some(401) | Some(403)) {
        return CatalogError::UserNotAuthorized {
            operation: ctx.operation.to_string(),
            user_id: ctx.user_id.to_string(),
            message,
        };
    }

    if class_name.ends_with("InvalidParameterException") || code == Some(400) {
        return CatalogError::InvalidParameter {
            operation: ctx.operation.to_string(),
            parameter: ffdc
                .parameter_name()
                .unwrap_or_else(|| "unknown".to_string()),
            reason: message,
            source_side: ParameterSource::Server,
        };
    }

    CatalogError::property_server(ctx.operation, code, message)
}
