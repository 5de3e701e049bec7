//! Versioned HTTP client for the HAProxy Dataplane REST API (spec §4.3, §6).
//!
//! [`DataplaneTransport`] is the dependency-injection seam the synchronizer is generic over,
//! modeled on the driver's separation between an `Operation`'s `build`/`handle_response` and the
//! connection carrying the wire bytes: the transactional retry loop, runtime-path detection, and
//! raw-push fallback are exercised in tests against a fake transport, never a real HAProxy
//! instance (SPEC_FULL.md §10.4).

pub mod capabilities;
mod endpoint;
pub mod transaction;

use serde_json::Value;
use typed_builder::TypedBuilder;

use crate::aux::{AuxOpKind, AuxOperation, FileKind};
use crate::error::{simplify_validation_message, Error, ErrorKind, Result};
use crate::operation::{OpKind, Operation};

pub use capabilities::Capabilities;

/// Connection settings for one target HAProxy instance's Dataplane API.
#[derive(Clone, Debug, TypedBuilder)]
#[builder(field_defaults(default, setter(into)))]
pub struct DataplaneClientConfig {
    #[builder(!default)]
    pub base_url: String,
    pub username: String,
    pub password: String,
}

/// The outcome of a commit (transactional or raw-push): whether a reload was triggered and, if
/// so, the id operators correlate post-reload events with (spec §9, "Commit status codes").
#[derive(Clone, Debug, PartialEq)]
pub struct CommitOutcome {
    pub reload_triggered: bool,
    pub reload_id: Option<String>,
}

/// A handle to an open transaction: just enough for the caller to keep issuing operations and
/// eventually commit or abort it. The full lifecycle is [`transaction::Transaction`].
#[derive(Clone, Debug, PartialEq)]
pub struct TransactionHandle {
    pub id: String,
    pub base_version: u64,
}

/// The seam the synchronizer depends on instead of a concrete HTTP client.
///
/// `Send + Sync` so one client can be shared across concurrently reconciling targets (spec §5,
/// "Shared resources") — a transaction id, unlike the client itself, is owned exclusively by one
/// synchronizer call.
pub trait DataplaneTransport: Send + Sync {
    async fn capabilities(&self) -> Result<Capabilities>;
    async fn configuration_version(&self) -> Result<u64>;
    async fn open_transaction(&self, version: u64) -> Result<TransactionHandle>;
    async fn commit_transaction(&self, tx: &TransactionHandle) -> Result<CommitOutcome>;
    async fn abort_transaction(&self, tx: &TransactionHandle) -> Result<()>;
    /// Applies a single operation, transactionally if `tx_id` is `Some`, against the runtime API
    /// otherwise (spec §4.3, §6: "same endpoints accept no `transaction_id` for runtime-only
    /// server updates").
    async fn apply_operation(&self, op: &Operation, tx_id: Option<&str>) -> Result<()>;
    async fn fetch_raw_configuration(&self) -> Result<String>;
    async fn push_raw_configuration(&self, text: &str) -> Result<CommitOutcome>;
    async fn apply_aux_operation(&self, op: &AuxOperation) -> Result<()>;
}

/// `reqwest`-backed [`DataplaneTransport`] implementation.
pub struct HttpDataplaneClient {
    http: reqwest::Client,
    config: DataplaneClientConfig,
}

impl HttpDataplaneClient {
    pub fn new(config: DataplaneClientConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http.request(method, self.url(path)).basic_auth(&self.config.username, Some(&self.config.password))
    }

    async fn decode_validation_error(response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.bytes().await.unwrap_or_default();
        ErrorKind::ValidationFailure { message: simplify_validation_message(&body) }.into_error().with_label(status.to_string())
    }

    fn reload_id_header(response: &reqwest::Response) -> Option<String> {
        response.headers().get("Reload-ID").and_then(|v| v.to_str().ok()).map(|s| s.to_string())
    }
}

impl DataplaneTransport for HttpDataplaneClient {
    async fn capabilities(&self) -> Result<Capabilities> {
        let response = self.request(reqwest::Method::GET, "/info").send().await?;
        let info: capabilities::InfoResponse = response.json().await?;
        Ok(Capabilities::from_version(&info.api.version))
    }

    async fn configuration_version(&self) -> Result<u64> {
        let response = self.request(reqwest::Method::GET, "/services/haproxy/configuration/version").send().await?;
        let version: u64 = response.json().await?;
        Ok(version)
    }

    async fn open_transaction(&self, version: u64) -> Result<TransactionHandle> {
        let response = self
            .request(reqwest::Method::POST, "/services/haproxy/transactions")
            .query(&[("version", version.to_string())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::decode_validation_error(response).await);
        }
        let body: Value = response.json().await?;
        let id = body
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::from(ErrorKind::Decode { message: "transaction response missing id".into() }))?
            .to_string();
        Ok(TransactionHandle { id, base_version: version })
    }

    async fn commit_transaction(&self, tx: &TransactionHandle) -> Result<CommitOutcome> {
        let path = format!("/services/haproxy/transactions/{}", tx.id);
        let response = self.request(reqwest::Method::PUT, &path).send().await?;
        match response.status().as_u16() {
            200 => Ok(CommitOutcome { reload_triggered: false, reload_id: None }),
            202 => {
                let reload_id = Self::reload_id_header(&response);
                Ok(CommitOutcome { reload_triggered: true, reload_id })
            }
            409 => {
                let observed: Value = response.json().await.unwrap_or(Value::Null);
                let actual = observed.get("version").and_then(Value::as_u64).unwrap_or(tx.base_version);
                Err(Error::version_conflict(tx.base_version, actual))
            }
            _ => Err(Self::decode_validation_error(response).await),
        }
    }

    async fn abort_transaction(&self, tx: &TransactionHandle) -> Result<()> {
        let path = format!("/services/haproxy/transactions/{}", tx.id);
        let response = self.request(reqwest::Method::DELETE, &path).send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_validation_error(response).await);
        }
        Ok(())
    }

    async fn apply_operation(&self, op: &Operation, tx_id: Option<&str>) -> Result<()> {
        let endpoint = endpoint::endpoint_for(op);
        let method = match op.kind {
            OpKind::Create => reqwest::Method::POST,
            OpKind::Update => reqwest::Method::PUT,
            OpKind::Delete => reqwest::Method::DELETE,
        };

        let mut request = self.request(method, &endpoint.path);
        for (key, value) in &endpoint.query {
            request = request.query(&[(*key, value.as_str())]);
        }
        if let Some(id) = tx_id {
            request = request.query(&[("transaction_id", id)]);
        }
        if !matches!(op.kind, OpKind::Delete) {
            request = request.json(&op.payload);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ErrorKind::OperationFailure {
                description: op.description.clone(),
                source: Box::new(Self::decode_validation_error(response).await.kind.as_ref().clone()),
            }
            .into_error());
        }
        Ok(())
    }

    async fn fetch_raw_configuration(&self) -> Result<String> {
        let response = self.request(reqwest::Method::GET, "/services/haproxy/configuration/raw").send().await?;
        Ok(response.text().await?)
    }

    async fn push_raw_configuration(&self, text: &str) -> Result<CommitOutcome> {
        let response =
            self.request(reqwest::Method::POST, "/services/haproxy/configuration/raw").body(text.to_string()).send().await?;
        match response.status().as_u16() {
            200 => Ok(CommitOutcome { reload_triggered: false, reload_id: None }),
            202 => {
                let reload_id = Self::reload_id_header(&response);
                Ok(CommitOutcome { reload_triggered: true, reload_id })
            }
            _ => Err(Self::decode_validation_error(response).await),
        }
    }

    async fn apply_aux_operation(&self, op: &AuxOperation) -> Result<()> {
        let store = match op.file_kind {
            FileKind::GeneralFile => "files",
            FileKind::SslCertificate => "ssl_certificates",
            FileKind::CrtList => "crt_lists",
            FileKind::MapFile => "maps",
        };
        let base = format!("/services/haproxy/storage/{store}");
        let (method, path) = match op.kind {
            AuxOpKind::Create => (reqwest::Method::POST, base),
            AuxOpKind::Update => (reqwest::Method::PUT, format!("{base}/{}", op.path)),
            AuxOpKind::Delete => (reqwest::Method::DELETE, format!("{base}/{}", op.path)),
        };
        let mut request = self.request(method, &path);
        if let Some(content) = &op.content {
            request = request.body(content.clone());
        }
        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_validation_error(response).await);
        }
        Ok(())
    }
}
