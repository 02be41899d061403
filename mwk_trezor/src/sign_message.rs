use mwk_common::{KeystoreInteraction, Level, Message, Network, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::connect::TrezorMethod;
use crate::interaction::{bip32_path_messages, trezor_messages, TrezorInteraction};
use crate::{impl_direct_interaction, Error};

/// Address of the signing key and base64 signature
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SignedMessage {
    pub address: String,
    pub signature: String,
}

/// Sign a text message with the key at a BIP32 path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrezorSignMessage {
    network: Network,
    bip32_path: String,
    message: String,
}

impl TrezorSignMessage {
    pub fn new(network: Network, bip32_path: &str, message: &str) -> Self {
        Self {
            network,
            bip32_path: bip32_path.to_string(),
            message: message.to_string(),
        }
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl KeystoreInteraction for TrezorSignMessage {
    fn messages(&self) -> Vec<Message> {
        let mut messages = trezor_messages();
        messages.extend(bip32_path_messages(&self.bip32_path));
        messages.push(Message::new(
            State::Active,
            Level::Info,
            "trezor.connect.sign",
            "Confirm in the Trezor Connect window that you want to 'Sign message'.  You may be prompted to enter your PIN.",
        ));
        messages.push(Message::new(
            State::Active,
            Level::Info,
            "trezor.sign",
            "Confirm the message to be signed on your Trezor device and approve for signing.",
        ));
        messages
    }
}

impl TrezorInteraction for TrezorSignMessage {
    type Output = SignedMessage;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        Ok((
            TrezorMethod::SignMessage,
            json!({
                "path": self.bip32_path,
                "message": self.message,
            }),
        ))
    }

    fn parse_payload(&self, payload: Value) -> Result<SignedMessage, Error> {
        Ok(serde_json::from_value(payload)?)
    }
}

impl_direct_interaction!(TrezorSignMessage);
