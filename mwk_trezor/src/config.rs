use std::env;
use std::fmt::Display;

use mwk_common::Network;
use serde::Serialize;

/// Pinned to avoid backwards incompatible changes of Trezor Connect
pub const TREZOR_CONNECT_SRC: &str = "https://connect.trezor.io/9.1.9/";

pub const DEV_CONNECT_SRC: &str = "https://localhost:8088/";

pub const DEV_BLOCKBOOK_URL: &str = "http://localhost:3035";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub email: String,
    pub app_url: String,
}

/// Parameters given to Trezor Connect when it is initialized, plus the development settings
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectConfig {
    pub connect_src: String,

    /// Do not inject the Trezor Connect iframe until a method is called
    pub lazy_load: bool,

    pub manifest: Manifest,

    /// Talk to a local Trezor Connect and a regtest blockbook
    #[serde(skip)]
    pub dev: bool,

    #[serde(skip)]
    pub blockbook_url: String,
}

impl Default for ConnectConfig {
    fn default() -> Self {
        Self {
            connect_src: TREZOR_CONNECT_SRC.into(),
            lazy_load: true,
            manifest: Manifest {
                email: "help@unchained.com".into(),
                app_url: "https://github.com/unchained-capital/unchained-wallets".into(),
            },
            dev: false,
            blockbook_url: DEV_BLOCKBOOK_URL.into(),
        }
    }
}

impl ConnectConfig {
    /// Read `TREZOR_DEV`, `TREZOR_CONNECT_URL` and `TREZOR_BLOCKBOOK_URL`
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| var(key).filter(|v| !v.is_empty());
        let dev = var("TREZOR_DEV").is_some();
        let mut config = Self {
            dev,
            blockbook_url: var("TREZOR_BLOCKBOOK_URL").unwrap_or_else(|| DEV_BLOCKBOOK_URL.into()),
            ..Self::default()
        };
        if dev {
            config.connect_src = var("TREZOR_CONNECT_URL").unwrap_or_else(|| DEV_CONNECT_SRC.into());
        }
        config
    }
}

/// The `coin` parameter of Trezor Connect methods
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrezorCoin {
    Bitcoin,
    Testnet,
    Regtest,
}

impl TrezorCoin {
    /// In development every network other than mainnet is the local regtest
    pub fn new(network: Network, dev: bool) -> Self {
        match network {
            Network::Mainnet => TrezorCoin::Bitcoin,
            _ if dev => TrezorCoin::Regtest,
            _ => TrezorCoin::Testnet,
        }
    }
}

impl Display for TrezorCoin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrezorCoin::Bitcoin => write!(f, "Bitcoin"),
            TrezorCoin::Testnet => write!(f, "Testnet"),
            TrezorCoin::Regtest => write!(f, "Regtest"),
        }
    }
}

impl Serialize for TrezorCoin {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
