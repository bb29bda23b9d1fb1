// Hand-crafted async HTTP client for the edge-site control-plane API.
//
// Base path: {endpoint}/api/v1/accounts/{accountId}/
// Auth: X-API-KEY header

use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types;

// ── Error response shape from the control-plane ──────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the control-plane API.
///
/// Uses API-key authentication and communicates via JSON REST endpoints
/// scoped to one account. Every method maps to exactly one HTTP request;
/// sequencing and retries are the caller's concern.
pub struct ControlPlaneClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ControlPlaneClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API key and transport config.
    ///
    /// Injects `X-API-KEY` as a default header on every request.
    pub fn from_api_key(
        endpoint: &str,
        account_id: &str,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid API key header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert("X-API-KEY", key_value);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(endpoint, account_id)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(
        endpoint: &str,
        account_id: &str,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(endpoint, account_id)?;
        Ok(Self { http, base_url })
    }

    /// Build `{endpoint}/api/v1/accounts/{account}/`, tolerating an
    /// endpoint that already ends in `/api`.
    fn normalize_base_url(raw: &str, account_id: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        let root = path.strip_suffix("/api").unwrap_or(&path);
        url.set_path(&format!("{root}/api/v1/accounts/{account_id}/"));
        Ok(url)
    }

    /// The account-scoped base URL every request is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        self.handle_response(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn put_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.parse_error(status, resp).await)
        }
    }

    async fn parse_error(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::InvalidApiKey;
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(60);
            return Error::RateLimited { retry_after_secs };
        }

        let raw = resp.text().await.unwrap_or_default();

        if let Ok(err) = serde_json::from_str::<ErrorResponse>(&raw) {
            Error::Api {
                status: status.as_u16(),
                message: err.message.unwrap_or_else(|| status.to_string()),
                code: err.code,
            }
        } else {
            Error::Api {
                status: status.as_u16(),
                message: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
                code: None,
            }
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Sites ────────────────────────────────────────────────────────

    pub async fn get_site(&self, site_id: &str) -> Result<types::SiteSnapshot, Error> {
        self.get(&format!("sites/{site_id}")).await
    }

    pub async fn update_site_general_details(
        &self,
        site_id: &str,
        body: &types::SiteGeneralDetailsUpdate,
    ) -> Result<(), Error> {
        self.put_no_response(&format!("sites/{site_id}/general-details"), body)
            .await
    }

    pub async fn remove_site(&self, site_id: &str) -> Result<(), Error> {
        self.delete(&format!("sites/{site_id}")).await
    }

    // ── Interfaces ───────────────────────────────────────────────────

    /// All interface slots of a site, as exposed for its connection type.
    pub async fn list_interfaces(
        &self,
        site_id: &str,
        connection_type: &str,
    ) -> Result<types::Listing<types::InterfaceSlot>, Error> {
        self.get_with_params(
            &format!("sites/{site_id}/interfaces"),
            &[("connectionType", connection_type.to_owned())],
        )
        .await
    }

    /// Slots of a site whose destination type is `LAN_LAG_MEMBER`.
    pub async fn list_lag_members(
        &self,
        site_id: &str,
    ) -> Result<types::Listing<types::InterfaceSlot>, Error> {
        self.get_with_params(
            &format!("sites/{site_id}/interfaces"),
            &[("destType", "LAN_LAG_MEMBER".to_owned())],
        )
        .await
    }

    pub async fn update_interface(
        &self,
        site_id: &str,
        index: &str,
        body: &types::InterfaceUpdate,
    ) -> Result<types::InterfaceUpdateResult, Error> {
        self.put(&format!("sites/{site_id}/interfaces/{index}"), body)
            .await
    }

    // ── Native range ─────────────────────────────────────────────────

    pub async fn get_native_range(&self, site_id: &str) -> Result<types::NativeRange, Error> {
        self.get(&format!("sites/{site_id}/ranges/native")).await
    }

    pub async fn update_native_range(
        &self,
        range_id: &str,
        body: &types::NativeRangeUpdate,
    ) -> Result<types::RangeUpdateResult, Error> {
        self.put(&format!("ranges/{range_id}"), body).await
    }

    // ── DHCP relay groups ────────────────────────────────────────────

    pub async fn find_relay_groups(
        &self,
        name: &str,
    ) -> Result<types::Listing<types::RelayGroup>, Error> {
        self.get_with_params("dhcp-relay-groups", &[("name", name.to_owned())])
            .await
    }
}
