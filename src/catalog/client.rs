//! Catalog Client
//!
//! Main client for the data platform catalog service, combining the fixed
//! per-client configuration with the HTTP layer. Every call goes through one
//! of four invocation shapes: GUID-producing, void, single element and
//! element list.

use super::auth::PlatformCredentials;
use super::http::{CatalogHttpClient, RequestContext};
use crate::error::{CatalogError, Result};
use crate::model::{ElementListResponse, ElementResponse, GuidResponse};
use crate::resource::{AddressError, RequestPath, ResourceKind};
use crate::validate::DEFAULT_MAX_PAGE_SIZE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_USER_AGENT: &str = concat!("dbplatform/", env!("CARGO_PKG_VERSION"));

/// Immutable client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub platform_url: Url,
    pub server_name: String,
    pub credentials: Option<PlatformCredentials>,
    /// Largest page the server accepts; 0 means unbounded
    pub max_page_size: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn builder(platform_url: impl Into<String>, server_name: impl Into<String>) -> ClientConfigBuilder {
        ClientConfigBuilder {
            platform_url: platform_url.into(),
            server_name: server_name.into(),
            credentials: None,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfigBuilder {
    platform_url: String,
    server_name: String,
    credentials: Option<PlatformCredentials>,
    max_page_size: u32,
    timeout: Duration,
    user_agent: String,
}

impl ClientConfigBuilder {
    pub fn credentials(mut self, credentials: PlatformCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn max_page_size(mut self, max_page_size: u32) -> Self {
        self.max_page_size = max_page_size;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> Result<ClientConfig> {
        const OPERATION: &str = "newClient";

        crate::validate::validate_name(&self.server_name, "serverName", OPERATION)?;
        crate::validate::validate_name(&self.platform_url, "platformURL", OPERATION)?;

        let platform_url = Url::parse(&self.platform_url).map_err(|e| {
            CatalogError::invalid(OPERATION, "platformURL", format!("'{}' is not a URL: {}", self.platform_url, e))
        })?;
        if !matches!(platform_url.scheme(), "http" | "https") {
            return Err(CatalogError::invalid(
                OPERATION,
                "platformURL",
                format!("unsupported scheme '{}'", platform_url.scheme()),
            ));
        }

        Ok(ClientConfig {
            platform_url,
            server_name: self.server_name,
            credentials: self.credentials,
            max_page_size: self.max_page_size,
            timeout: self.timeout,
            user_agent: self.user_agent,
        })
    }
}

/// Main catalog client
///
/// Holds no mutable state; a single instance can be shared between tasks.
#[derive(Clone)]
pub struct CatalogClient {
    pub http: CatalogHttpClient,
    config: ClientConfig,
}

impl CatalogClient {
    /// Create a new catalog client
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = CatalogHttpClient::new(&config.user_agent, config.timeout, config.credentials.clone())?;
        tracing::debug!(
            "catalog client for server {} at {}",
            config.server_name,
            config.platform_url
        );
        Ok(Self { http, config })
    }

    pub fn server_name(&self) -> &str {
        &self.config.server_name
    }

    pub fn platform_url(&self) -> &Url {
        &self.config.platform_url
    }

    pub fn max_page_size(&self) -> u32 {
        self.config.max_page_size
    }

    fn resolve(&self, ctx: RequestContext<'_>, path: &RequestPath) -> Result<Url> {
        path.to_url(&self.config.platform_url).map_err(|e| match e {
            AddressError::DotSegment(_) => CatalogError::invalid(ctx.operation, "path", e.to_string()),
            AddressError::Parse(_) => {
                CatalogError::invalid(ctx.operation, "platformURL", format!("cannot address {}: {}", path, e))
            }
        })
    }

    /// Submit a body and return the GUID the server assigned
    pub async fn call_guid<B: Serialize + ?Sized>(
        &self,
        ctx: RequestContext<'_>,
        path: &RequestPath,
        body: &B,
    ) -> Result<String> {
        let url = self.resolve(ctx, path)?;
        let value = self.http.post(ctx, &url, body).await?;
        let response: GuidResponse = decode(ctx, value)?;

        match response.guid {
            Some(guid) if !guid.is_empty() => Ok(guid),
            _ => Err(CatalogError::property_server(
                ctx.operation,
                None,
                "server response did not include a GUID",
            )),
        }
    }

    /// Submit a body where only success or failure matters
    pub async fn call_void<B: Serialize + ?Sized>(
        &self,
        ctx: RequestContext<'_>,
        path: &RequestPath,
        body: &B,
    ) -> Result<()> {
        let url = self.resolve(ctx, path)?;
        self.http.post(ctx, &url, body).await?;
        Ok(())
    }

    /// Read one element; absence is reported as `NotFound`
    pub async fn call_element<E: DeserializeOwned>(
        &self,
        ctx: RequestContext<'_>,
        path: &RequestPath,
        kind: ResourceKind,
        guid: &str,
    ) -> Result<E> {
        let not_found = || CatalogError::NotFound {
            operation: ctx.operation.to_string(),
            kind: kind.to_string(),
            guid: guid.to_string(),
        };

        let url = self.resolve(ctx, path)?;
        let value = match self.http.get(ctx, &url).await {
            Ok(value) => value,
            Err(CatalogError::PropertyServer {
                status: Some(404), ..
            }) => return Err(not_found()),
            Err(e) => return Err(e),
        };

        let response: ElementResponse<E> = decode(ctx, value)?;
        response.element.ok_or_else(not_found)
    }

    /// Read a page of elements; an empty page is a normal result
    pub async fn call_elements<E: DeserializeOwned>(
        &self,
        ctx: RequestContext<'_>,
        path: &RequestPath,
    ) -> Result<Vec<E>> {
        let url = self.resolve(ctx, path)?;
        let value = self.http.get(ctx, &url).await?;
        let response: ElementListResponse<E> = decode(ctx, value)?;
        Ok(response.into_elements())
    }
}

/// Decode a response envelope. An empty body decodes as an empty envelope.
fn decode<T: DeserializeOwned>(ctx: RequestContext<'_>, value: Value) -> Result<T> {
    let value = if value.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        value
    };
    serde_json::from_value(value).map_err(|e| {
        CatalogError::property_server(ctx.operation, None, format!("malformed response envelope: {}", e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const CTX: RequestContext<'static> = RequestContext {
        operation: "getDatabaseByGUID",
        user_id: "erin",
    };

    #[test]
    fn test_builder_defaults() {
        let config = ClientConfig::builder("https://localhost:9443", "cocoMDS1")
            .build()
            .unwrap();
        assert_eq!(config.server_name, "cocoMDS1");
        assert_eq!(config.max_page_size, DEFAULT_MAX_PAGE_SIZE);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.credentials.is_none());
        assert!(config.user_agent.starts_with("dbplatform/"));
    }

    #[test]
    fn test_builder_rejects_bad_input() {
        let err = ClientConfig::builder("not a url", "cocoMDS1").build().unwrap_err();
        assert!(err.to_string().contains("platformURL"));

        let err = ClientConfig::builder("ftp://host", "cocoMDS1").build().unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));

        let err = ClientConfig::builder("https://localhost:9443", "").build().unwrap_err();
        assert!(err.to_string().contains("serverName"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::builder("http://localhost:8080", "cocoMDS1")
            .credentials(PlatformCredentials::basic("npa", "secret"))
            .max_page_size(50)
            .timeout(Duration::from_secs(5))
            .user_agent("tests")
            .build()
            .unwrap();
        assert_eq!(config.max_page_size, 50);
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
        assert!(config.credentials.is_some());
    }

    #[test]
    fn test_decode_empty_body_as_empty_envelope() {
        let response: GuidResponse = decode(CTX, Value::Null).unwrap();
        assert!(response.guid.is_none());
    }

    #[test]
    fn test_decode_malformed_envelope() {
        let err = decode::<GuidResponse>(CTX, json!({"guid": 42})).unwrap_err();
        assert!(matches!(err, CatalogError::PropertyServer { .. }));
    }
}
