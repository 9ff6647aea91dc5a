use crate::rubrik::error::{RubrikError, Result as CdmResult};
use crate::settings::Settings;
use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Base timeout applied when neither the caller nor the operation asks for another one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default for snapshot and blackout operations, which the cluster answers slowly.
pub const LONG_RUNNING_TIMEOUT: Duration = Duration::from_secs(180);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    V1,
    Internal,
}

impl ApiVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::Internal => "internal",
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub enum Credentials {
    Basic { username: String, password: String },
    Token(String),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .finish_non_exhaustive(),
            Credentials::Token(_) => f.write_str("Token(..)"),
        }
    }
}

#[derive(Clone)]
pub struct RubrikClient {
    pub(crate) client: Client,
    pub(crate) base_url: Url,
    credentials: Credentials,
    default_timeout: Duration,
}

impl RubrikClient {
    pub fn new(node_ip: &str, credentials: Credentials, verify_ssl: bool) -> Result<Self> {
        let scheme = if node_ip.starts_with("http://") {
            "http"
        } else {
            "https"
        };

        let host_cleaned = if let Some(stripped) = node_ip.strip_prefix("http://") {
            stripped
        } else if let Some(stripped) = node_ip.strip_prefix("https://") {
            stripped
        } else {
            node_ip
        };
        let host_cleaned = host_cleaned.trim_end_matches('/');

        let url_str = format!("{}://{}/api/", scheme, host_cleaned);

        let base_url = Url::parse(&url_str).context("Invalid node IP")?;

        let client = Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .context("Failed to build reqwest client")?;

        Ok(Self {
            client,
            base_url,
            credentials,
            default_timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Builds a client from validated settings.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

        let node_ip = settings.node_ip.as_deref().unwrap_or_default();
        let credentials = match &settings.api_token {
            Some(token) if !token.is_empty() => Credentials::Token(token.clone()),
            _ => Credentials::Basic {
                username: settings.username.clone().unwrap_or_default(),
                password: settings.password.clone().unwrap_or_default(),
            },
        };

        info!("Connecting to Rubrik cluster at {}", node_ip);
        let mut client = Self::new(
            node_ip,
            credentials,
            !settings.no_verify_ssl.unwrap_or(false),
        )?;
        if let Some(secs) = settings.timeout {
            client = client.with_default_timeout(Duration::from_secs(secs));
        }
        Ok(client)
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    /// Caller override, then the operation's own default, then the client default.
    pub fn resolve_timeout(
        &self,
        caller: Option<Duration>,
        operation_default: Option<Duration>,
    ) -> Duration {
        caller
            .or(operation_default)
            .unwrap_or(self.default_timeout)
    }

    pub(crate) async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        version: ApiVersion,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&B>,
        timeout: Duration,
    ) -> CdmResult<T> {
        let mut url = self
            .base_url
            .join(&format!("{}/{}", version, path.trim_start_matches('/')))
            .map_err(RubrikError::Url)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        debug!("{} {} (timeout {}s)", method, url, timeout.as_secs());
        let mut req = self.client.request(method, url).timeout(timeout);

        req = match &self.credentials {
            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),
            Credentials::Token(token) => req.bearer_auth(token),
        };

        if let Some(b) = body {
            req = req.json(b);
        }

        let resp = req.send().await.map_err(RubrikError::Request)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(RubrikError::Api(status, text));
        }

        let bytes = resp.bytes().await.map_err(RubrikError::Request)?;
        if bytes.is_empty() {
            // 204 responses from the internal API carry no body
            return serde_json::from_value(serde_json::Value::Null).map_err(RubrikError::Json);
        }
        serde_json::from_slice(&bytes).map_err(RubrikError::Json)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        version: ApiVersion,
        path: &str,
        query: &[(&str, &str)],
        timeout: Duration,
    ) -> CdmResult<T> {
        self.request::<T, ()>(Method::GET, version, path, query, None, timeout)
            .await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        version: ApiVersion,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> CdmResult<T> {
        self.request(Method::POST, version, path, &[], Some(body), timeout)
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        version: ApiVersion,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> CdmResult<T> {
        self.request(Method::PATCH, version, path, &[], Some(body), timeout)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> RubrikClient {
        RubrikClient::new(
            "https://10.0.0.1/",
            Credentials::Token("t".into()),
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_base_url_normalized() {
        assert_eq!(client().base_url.as_str(), "https://10.0.0.1/api/");

        let plain = RubrikClient::new("http://127.0.0.1:8080", Credentials::Token("t".into()), true)
            .unwrap();
        assert_eq!(plain.base_url.as_str(), "http://127.0.0.1:8080/api/");
    }

    #[test]
    fn test_timeout_precedence() {
        let c = client();
        let caller = Duration::from_secs(5);
        assert_eq!(
            c.resolve_timeout(Some(caller), Some(LONG_RUNNING_TIMEOUT)),
            caller
        );
        assert_eq!(
            c.resolve_timeout(None, Some(LONG_RUNNING_TIMEOUT)),
            LONG_RUNNING_TIMEOUT
        );
        assert_eq!(c.resolve_timeout(None, None), DEFAULT_TIMEOUT);

        let c = c.with_default_timeout(Duration::from_secs(30));
        assert_eq!(c.resolve_timeout(None, None), Duration::from_secs(30));
    }

    #[test]
    fn test_from_settings_prefers_token() {
        let settings = Settings {
            node_ip: Some("10.0.0.1".into()),
            username: Some("admin".into()),
            password: Some("pw".into()),
            api_token: Some("tok".into()),
            ..Default::default()
        };
        let c = RubrikClient::from_settings(&settings).unwrap();
        assert!(matches!(&c.credentials, Credentials::Token(t) if t == "tok"));

        let settings = Settings {
            api_token: None,
            timeout: Some(42),
            ..settings
        };
        let c = RubrikClient::from_settings(&settings).unwrap();
        assert!(matches!(
            &c.credentials,
            Credentials::Basic { username, .. } if username == "admin"
        ));
        assert_eq!(c.default_timeout(), Duration::from_secs(42));
    }

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let basic = Credentials::Basic {
            username: "admin".into(),
            password: "hunter2".into(),
        };
        assert!(!format!("{:?}", basic).contains("hunter2"));
        assert!(!format!("{:?}", Credentials::Token("abc".into())).contains("abc"));
    }
}
