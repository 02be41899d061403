use mwk_coldcard::ColdcardMultisigWalletConfig;
use mwk_common::{KeystoreInteraction, Message, UnsupportedInteraction};
use serde_json::Value;

use crate::interaction::unsupported;
use crate::{Error, InteractionKind, Keystore};

const TRANSLATION_UNSUPPORTED: &str =
    "This keystore is not supported when translating external spend configuration files.";

/// Register a wallet policy on the device.
///
/// Only Ledger and BitBox devices register policies, none of them is driven by this crate.
pub fn register_wallet_policy(keystore: Keystore) -> UnsupportedInteraction {
    tracing::debug!("no wallet policy registration for {keystore}");
    unsupported(TRANSLATION_UNSUPPORTED)
}

/// Translate a wallet configuration into the format the keystore imports
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAdapter {
    Coldcard(ColdcardMultisigWalletConfig),
    Unsupported(UnsupportedInteraction),
}

impl ConfigAdapter {
    /// `json_config` is either the parsed configuration or its text
    pub fn new(keystore: Keystore, json_config: Value) -> Result<Self, Error> {
        Ok(match keystore {
            Keystore::Coldcard => {
                ConfigAdapter::Coldcard(ColdcardMultisigWalletConfig::new(json_config)?)
            }
            Keystore::Ledger | Keystore::LedgerV2 | Keystore::BitBox => {
                ConfigAdapter::Unsupported(register_wallet_policy(keystore))
            }
            _ => ConfigAdapter::Unsupported(unsupported(TRANSLATION_UNSUPPORTED)),
        })
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            ConfigAdapter::Coldcard(_) => InteractionKind::Indirect,
            ConfigAdapter::Unsupported(_) => InteractionKind::Unsupported,
        }
    }

    /// The configuration in the format of the keystore
    pub fn adapt(&self) -> Result<String, Error> {
        match self {
            ConfigAdapter::Coldcard(config) => Ok(config.adapt()?),
            ConfigAdapter::Unsupported(i) => Ok(i.request()?),
        }
    }
}

impl KeystoreInteraction for ConfigAdapter {
    fn is_supported(&self) -> bool {
        match self {
            ConfigAdapter::Coldcard(i) => i.is_supported(),
            ConfigAdapter::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            ConfigAdapter::Coldcard(i) => i.messages(),
            ConfigAdapter::Unsupported(i) => i.messages(),
        }
    }
}
