use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// The keystores known by the coordinator.
///
/// Ledger and BitBox only exist as identifiers: every operation answers with an unsupported
/// interaction for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keystore {
    Trezor,
    Ledger,
    LedgerV2,
    #[serde(rename = "bitbox")]
    BitBox,
    Hermit,
    Coldcard,
    Custom,
}

impl Keystore {
    pub const ALL: [Keystore; 7] = [
        Keystore::Trezor,
        Keystore::Ledger,
        Keystore::LedgerV2,
        Keystore::BitBox,
        Keystore::Hermit,
        Keystore::Coldcard,
        Keystore::Custom,
    ];
}

impl Display for Keystore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Keystore::Trezor => "trezor",
            Keystore::Ledger => "ledger",
            Keystore::LedgerV2 => "ledger_v2",
            Keystore::BitBox => "bitbox",
            Keystore::Hermit => "hermit",
            Keystore::Coldcard => "coldcard",
            Keystore::Custom => "custom",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Keystore {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keystore::ALL
            .into_iter()
            .find(|k| k.to_string() == s)
            .ok_or_else(|| Error::UnknownKeystore(s.to_string()))
    }
}
