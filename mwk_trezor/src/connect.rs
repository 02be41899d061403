use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::OnceCell;

use crate::config::ConnectConfig;
use crate::Error;

static CONNECTION: OnceCell<TrezorConnection> = OnceCell::const_new();

/// Trezor Connect methods used by the interactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrezorMethod {
    GetFeatures,
    GetPublicKey,
    GetAddress,
    SignTransaction,
    SignMessage,
    BlockchainSetCustomBackend,
}

impl Display for TrezorMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrezorMethod::GetFeatures => write!(f, "getFeatures"),
            TrezorMethod::GetPublicKey => write!(f, "getPublicKey"),
            TrezorMethod::GetAddress => write!(f, "getAddress"),
            TrezorMethod::SignTransaction => write!(f, "signTransaction"),
            TrezorMethod::SignMessage => write!(f, "signMessage"),
            TrezorMethod::BlockchainSetCustomBackend => write!(f, "blockchainSetCustomBackend"),
        }
    }
}

/// What every Trezor Connect method resolves to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectResponse {
    pub success: bool,
    pub payload: Value,
}

impl ConnectResponse {
    pub fn ok(payload: Value) -> Self {
        Self {
            success: true,
            payload,
        }
    }

    pub fn failure(error: &str) -> Self {
        Self {
            success: false,
            payload: json!({ "error": error }),
        }
    }
}

/// The bridge to Trezor Connect, implemented by the embedding application
#[async_trait]
pub trait TrezorConnect: Send + Sync {
    async fn init(&self, config: &ConnectConfig) -> Result<(), Error>;

    async fn call(&self, method: TrezorMethod, params: Value) -> Result<ConnectResponse, Error>;
}

/// An initialized bridge with the configuration it was initialized with
#[derive(Clone)]
pub struct TrezorConnection {
    bridge: Arc<dyn TrezorConnect>,
    config: ConnectConfig,
}

impl std::fmt::Debug for TrezorConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrezorConnection")
            .field("config", &self.config)
            .finish()
    }
}

impl TrezorConnection {
    /// Initialize `bridge` with `config`
    pub async fn new(bridge: Arc<dyn TrezorConnect>, config: ConnectConfig) -> Result<Self, Error> {
        tracing::info!("initializing Trezor Connect from {}", config.connect_src);
        bridge.init(&config).await.map_err(|e| {
            tracing::error!("Unable to initialize Trezor Connect: {e}");
            Error::Init(e.to_string())
        })?;
        Ok(Self { bridge, config })
    }

    pub fn config(&self) -> &ConnectConfig {
        &self.config
    }

    /// Call `method`, returning the payload of a successful response
    pub async fn call(&self, method: TrezorMethod, params: Value) -> Result<Value, Error> {
        tracing::debug!("calling Trezor Connect {method}");
        let response = self.bridge.call(method, params).await?;
        if !response.success {
            let error = match response.payload.get("error") {
                Some(Value::String(error)) => error.clone(),
                Some(error) => error.to_string(),
                None => format!("{method} failed"),
            };
            tracing::warn!("Trezor Connect {method} failed: {error}");
            return Err(Error::Connect(error));
        }
        Ok(response.payload)
    }

    /// Point Trezor Connect to the local blockbook, used in development before signing
    pub(crate) async fn set_custom_backend(&self) -> Result<(), Error> {
        let params = json!({
            "coin": "Regtest",
            "blockchainLink": {
                "type": "blockbook",
                "url": [self.config.blockbook_url],
            },
        });
        self.call(TrezorMethod::BlockchainSetCustomBackend, params)
            .await?;
        Ok(())
    }
}

/// Initialize the process wide connection, following calls return the first connection.
///
/// When initialization fails the error is logged and returned, a later call tries again.
pub async fn initialize_once(
    bridge: Arc<dyn TrezorConnect>,
    config: ConnectConfig,
) -> Result<&'static TrezorConnection, Error> {
    CONNECTION
        .get_or_try_init(|| TrezorConnection::new(bridge, config))
        .await
}

/// The process wide connection
pub fn connection() -> Result<&'static TrezorConnection, Error> {
    CONNECTION.get().ok_or(Error::NotInitialized)
}

/// Whether interactions target the development environment
pub(crate) fn dev_mode() -> bool {
    match CONNECTION.get() {
        Some(connection) => connection.config.dev,
        None => ConnectConfig::from_env().dev,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_method_names() {
        assert_eq!(TrezorMethod::GetPublicKey.to_string(), "getPublicKey");
        assert_eq!(
            TrezorMethod::BlockchainSetCustomBackend.to_string(),
            "blockchainSetCustomBackend"
        );
    }

    #[test]
    fn test_response_serialization() {
        let response: ConnectResponse =
            serde_json::from_value(json!({"success": false, "payload": {"error": "foobar"}}))
                .unwrap();
        assert_eq!(response, ConnectResponse::failure("foobar"));
    }
}
