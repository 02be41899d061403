//! Operations only a connected device performs

use mwk_common::{
    DeviceMetadata, KeystoreInteraction, Message, Multisig, Network, UnsupportedInteraction,
};
use mwk_trezor::{
    SignedMessage, TrezorConfirmMultisigAddress, TrezorGetMetadata, TrezorSignMessage,
};
use serde_json::Value;

use crate::interaction::{parse_direct, request_direct, run_direct, unsupported};
use crate::{Error, InteractionKind, Keystore};

/// Read model, firmware version and protection settings of the device
#[derive(Debug, Clone, PartialEq)]
pub enum GetMetadata {
    Trezor(TrezorGetMetadata),
    Unsupported(UnsupportedInteraction),
}

impl GetMetadata {
    pub fn new(keystore: Keystore) -> Self {
        match keystore {
            Keystore::Trezor => GetMetadata::Trezor(TrezorGetMetadata::new()),
            _ => GetMetadata::Unsupported(unsupported("This keystore does not return a version.")),
        }
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            GetMetadata::Trezor(_) => InteractionKind::Direct,
            GetMetadata::Unsupported(_) => InteractionKind::Unsupported,
        }
    }

    pub async fn run(&self) -> Result<DeviceMetadata, Error> {
        match self {
            GetMetadata::Trezor(i) => run_direct(i).await,
            GetMetadata::Unsupported(i) => Ok(i.run().await?),
        }
    }

    pub fn request(&self) -> Result<Value, Error> {
        match self {
            GetMetadata::Trezor(i) => request_direct(i),
            GetMetadata::Unsupported(i) => Ok(i.request()?),
        }
    }

    pub fn parse(&self, response: Value) -> Result<DeviceMetadata, Error> {
        match self {
            GetMetadata::Trezor(i) => parse_direct(i, response),
            GetMetadata::Unsupported(i) => Ok(i.parse(response)?),
        }
    }
}

impl KeystoreInteraction for GetMetadata {
    fn is_supported(&self) -> bool {
        match self {
            GetMetadata::Trezor(i) => i.is_supported(),
            GetMetadata::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            GetMetadata::Trezor(i) => i.messages(),
            GetMetadata::Unsupported(i) => i.messages(),
        }
    }
}

/// Sign a text message with the key at a BIP32 path
#[derive(Debug, Clone, PartialEq)]
pub enum SignMessage {
    Trezor(TrezorSignMessage),
    Unsupported(UnsupportedInteraction),
}

impl SignMessage {
    pub fn new(keystore: Keystore, network: Network, bip32_path: &str, message: &str) -> Self {
        match keystore {
            Keystore::Trezor => {
                SignMessage::Trezor(TrezorSignMessage::new(network, bip32_path, message))
            }
            _ => SignMessage::Unsupported(unsupported(
                "This keystore is not supported when signing a message.",
            )),
        }
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            SignMessage::Trezor(_) => InteractionKind::Direct,
            SignMessage::Unsupported(_) => InteractionKind::Unsupported,
        }
    }

    pub async fn run(&self) -> Result<SignedMessage, Error> {
        match self {
            SignMessage::Trezor(i) => run_direct(i).await,
            SignMessage::Unsupported(i) => Ok(i.run().await?),
        }
    }

    pub fn request(&self) -> Result<Value, Error> {
        match self {
            SignMessage::Trezor(i) => request_direct(i),
            SignMessage::Unsupported(i) => Ok(i.request()?),
        }
    }

    pub fn parse(&self, response: Value) -> Result<SignedMessage, Error> {
        match self {
            SignMessage::Trezor(i) => parse_direct(i, response),
            SignMessage::Unsupported(i) => Ok(i.parse(response)?),
        }
    }
}

impl KeystoreInteraction for SignMessage {
    fn is_supported(&self) -> bool {
        match self {
            SignMessage::Trezor(i) => i.is_supported(),
            SignMessage::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            SignMessage::Trezor(i) => i.messages(),
            SignMessage::Unsupported(i) => i.messages(),
        }
    }
}

/// Display a multisig address on the device.
///
/// `public_key`, when given, is the key expected at `bip32_path`.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmMultisigAddress {
    Trezor(TrezorConfirmMultisigAddress),
    Unsupported(UnsupportedInteraction),
}

impl ConfirmMultisigAddress {
    pub fn new(
        keystore: Keystore,
        network: Network,
        bip32_path: &str,
        multisig: Multisig,
        public_key: Option<String>,
    ) -> Self {
        match keystore {
            Keystore::Trezor => ConfirmMultisigAddress::Trezor(TrezorConfirmMultisigAddress::new(
                network, bip32_path, multisig, public_key,
            )),
            _ => ConfirmMultisigAddress::Unsupported(unsupported(
                "This keystore is not supported when confirming multisig addresses.",
            )),
        }
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            ConfirmMultisigAddress::Trezor(_) => InteractionKind::Direct,
            ConfirmMultisigAddress::Unsupported(_) => InteractionKind::Unsupported,
        }
    }

    pub async fn run(&self) -> Result<Value, Error> {
        match self {
            ConfirmMultisigAddress::Trezor(i) => run_direct(i).await,
            ConfirmMultisigAddress::Unsupported(i) => Ok(i.run().await?),
        }
    }

    pub fn request(&self) -> Result<Value, Error> {
        match self {
            ConfirmMultisigAddress::Trezor(i) => request_direct(i),
            ConfirmMultisigAddress::Unsupported(i) => Ok(i.request()?),
        }
    }

    pub fn parse(&self, response: Value) -> Result<Value, Error> {
        match self {
            ConfirmMultisigAddress::Trezor(i) => parse_direct(i, response),
            ConfirmMultisigAddress::Unsupported(i) => Ok(i.parse(response)?),
        }
    }
}

impl KeystoreInteraction for ConfirmMultisigAddress {
    fn is_supported(&self) -> bool {
        match self {
            ConfirmMultisigAddress::Trezor(i) => i.is_supported(),
            ConfirmMultisigAddress::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            ConfirmMultisigAddress::Trezor(i) => i.messages(),
            ConfirmMultisigAddress::Unsupported(i) => i.messages(),
        }
    }
}

#[cfg(test)]
mod test {
    use mwk_common::{AddressType, State};
    use mwk_test_util::*;
    use serde_json::json;

    use super::*;

    fn multisig() -> Multisig {
        Multisig::new(
            AddressType::P2sh,
            Network::Testnet,
            2,
            &[MULTISIG_PUBKEY_1.to_string(), MULTISIG_PUBKEY_2.to_string()],
        )
        .unwrap()
    }

    #[test]
    fn test_only_trezor() {
        for keystore in Keystore::ALL {
            let is_trezor = keystore == Keystore::Trezor;
            assert_eq!(GetMetadata::new(keystore).is_supported(), is_trezor);
            let interaction = SignMessage::new(keystore, Network::Testnet, "m/45'/0/0/0", "hi");
            assert_eq!(interaction.kind() == InteractionKind::Direct, is_trezor);
            let interaction = ConfirmMultisigAddress::new(
                keystore,
                Network::Testnet,
                MULTISIG_SIGNING_PATH,
                multisig(),
                None,
            );
            assert_eq!(interaction.is_supported(), is_trezor);
        }
    }

    #[tokio::test]
    async fn test_unsupported_texts() {
        let interaction = GetMetadata::new(Keystore::Coldcard);
        let err = interaction.run().await.unwrap_err();
        assert_eq!(err.to_string(), "This keystore does not return a version.");
        let message = &interaction.messages()[0];
        assert_eq!(message.state, State::Unsupported);

        let interaction = SignMessage::new(Keystore::Hermit, Network::Testnet, "m/45'", "hi");
        let err = interaction.request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "This keystore is not supported when signing a message."
        );

        let interaction = ConfirmMultisigAddress::new(
            Keystore::Ledger,
            Network::Testnet,
            MULTISIG_SIGNING_PATH,
            multisig(),
            None,
        );
        let err = interaction.parse(json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This keystore is not supported when confirming multisig addresses."
        );
    }
}
