use mwk_coldcard::{ColdcardExportExtendedPublicKey, ColdcardExportPublicKey};
use mwk_common::{
    ExtendedPublicKeyExport, IndirectKeystoreInteraction, KeystoreInteraction, Message, Network,
    PublicKeyExport, UnsupportedInteraction, WorkflowStep,
};
use mwk_custom::CustomExportExtendedPublicKey;
use mwk_hermit::HermitExportExtendedPublicKey;
use mwk_trezor::{TrezorExportExtendedPublicKey, TrezorExportPublicKey};
use serde_json::Value;

use crate::interaction::{
    parse_direct, parse_indirect, request_direct, request_indirect, run_direct, run_indirect,
    unsupported,
};
use crate::{Error, InteractionKind, Keystore};

/// Export the public key at a BIP32 path
#[derive(Debug, Clone, PartialEq)]
pub enum ExportPublicKey {
    Coldcard(ColdcardExportPublicKey),
    Trezor(TrezorExportPublicKey),
    Unsupported(UnsupportedInteraction),
}

impl ExportPublicKey {
    /// `include_xfp` asks the keystore for the root fingerprint too, when it needs asking
    pub fn new(
        keystore: Keystore,
        network: Network,
        bip32_path: &str,
        include_xfp: bool,
    ) -> Result<Self, Error> {
        Ok(match keystore {
            Keystore::Coldcard => {
                ExportPublicKey::Coldcard(ColdcardExportPublicKey::new(network, bip32_path)?)
            }
            Keystore::Trezor => ExportPublicKey::Trezor(TrezorExportPublicKey::new(
                network,
                bip32_path,
                include_xfp,
            )),
            _ => ExportPublicKey::Unsupported(unsupported(
                "This keystore is not supported when exporting public keys.",
            )),
        })
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            ExportPublicKey::Coldcard(_) => InteractionKind::Indirect,
            ExportPublicKey::Trezor(_) => InteractionKind::Direct,
            ExportPublicKey::Unsupported(_) => InteractionKind::Unsupported,
        }
    }

    pub fn workflow(&self) -> &'static [WorkflowStep] {
        match self {
            ExportPublicKey::Coldcard(i) => i.workflow(),
            _ => &[],
        }
    }

    pub async fn run(&self) -> Result<PublicKeyExport, Error> {
        match self {
            ExportPublicKey::Coldcard(i) => run_indirect(i).await,
            ExportPublicKey::Trezor(i) => run_direct(i).await,
            ExportPublicKey::Unsupported(i) => Ok(i.run().await?),
        }
    }

    pub fn request(&self) -> Result<Value, Error> {
        match self {
            ExportPublicKey::Coldcard(i) => request_indirect(i),
            ExportPublicKey::Trezor(i) => request_direct(i),
            ExportPublicKey::Unsupported(i) => Ok(i.request()?),
        }
    }

    pub fn parse(&self, response: Value) -> Result<PublicKeyExport, Error> {
        match self {
            ExportPublicKey::Coldcard(i) => parse_indirect(i, response),
            ExportPublicKey::Trezor(i) => parse_direct(i, response),
            ExportPublicKey::Unsupported(i) => Ok(i.parse(response)?),
        }
    }
}

impl KeystoreInteraction for ExportPublicKey {
    fn is_supported(&self) -> bool {
        match self {
            ExportPublicKey::Coldcard(i) => i.is_supported(),
            ExportPublicKey::Trezor(i) => i.is_supported(),
            ExportPublicKey::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            ExportPublicKey::Coldcard(i) => i.messages(),
            ExportPublicKey::Trezor(i) => i.messages(),
            ExportPublicKey::Unsupported(i) => i.messages(),
        }
    }
}

/// Export the extended public key at a BIP32 path
#[derive(Debug, Clone, PartialEq)]
pub enum ExportExtendedPublicKey {
    Coldcard(ColdcardExportExtendedPublicKey),
    Custom(CustomExportExtendedPublicKey),
    Hermit(HermitExportExtendedPublicKey),
    Trezor(TrezorExportExtendedPublicKey),
    Unsupported(UnsupportedInteraction),
}

impl ExportExtendedPublicKey {
    pub fn new(
        keystore: Keystore,
        network: Network,
        bip32_path: &str,
        include_xfp: bool,
    ) -> Result<Self, Error> {
        Ok(match keystore {
            Keystore::Coldcard => ExportExtendedPublicKey::Coldcard(
                ColdcardExportExtendedPublicKey::new(network, bip32_path)?,
            ),
            Keystore::Custom => ExportExtendedPublicKey::Custom(
                CustomExportExtendedPublicKey::new(network, bip32_path)?,
            ),
            Keystore::Hermit => {
                ExportExtendedPublicKey::Hermit(HermitExportExtendedPublicKey::new(bip32_path))
            }
            Keystore::Trezor => ExportExtendedPublicKey::Trezor(
                TrezorExportExtendedPublicKey::new(network, bip32_path, include_xfp),
            ),
            _ => ExportExtendedPublicKey::Unsupported(unsupported(
                "This keystore is not supported when exporting extended public keys.",
            )),
        })
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            ExportExtendedPublicKey::Trezor(_) => InteractionKind::Direct,
            ExportExtendedPublicKey::Unsupported(_) => InteractionKind::Unsupported,
            _ => InteractionKind::Indirect,
        }
    }

    pub fn workflow(&self) -> &'static [WorkflowStep] {
        match self {
            ExportExtendedPublicKey::Coldcard(i) => i.workflow(),
            ExportExtendedPublicKey::Custom(i) => i.workflow(),
            ExportExtendedPublicKey::Hermit(i) => i.workflow(),
            _ => &[],
        }
    }

    pub async fn run(&self) -> Result<ExtendedPublicKeyExport, Error> {
        match self {
            ExportExtendedPublicKey::Coldcard(i) => run_indirect(i).await,
            ExportExtendedPublicKey::Custom(i) => run_indirect(i).await,
            ExportExtendedPublicKey::Hermit(i) => run_indirect(i).await,
            ExportExtendedPublicKey::Trezor(i) => run_direct(i).await,
            ExportExtendedPublicKey::Unsupported(i) => Ok(i.run().await?),
        }
    }

    pub fn request(&self) -> Result<Value, Error> {
        match self {
            ExportExtendedPublicKey::Coldcard(i) => request_indirect(i),
            ExportExtendedPublicKey::Custom(i) => request_indirect(i),
            ExportExtendedPublicKey::Hermit(i) => request_indirect(i),
            ExportExtendedPublicKey::Trezor(i) => request_direct(i),
            ExportExtendedPublicKey::Unsupported(i) => Ok(i.request()?),
        }
    }

    pub fn parse(&self, response: Value) -> Result<ExtendedPublicKeyExport, Error> {
        match self {
            ExportExtendedPublicKey::Coldcard(i) => parse_indirect(i, response),
            ExportExtendedPublicKey::Custom(i) => parse_indirect(i, response),
            ExportExtendedPublicKey::Hermit(i) => parse_indirect(i, response),
            ExportExtendedPublicKey::Trezor(i) => parse_direct(i, response),
            ExportExtendedPublicKey::Unsupported(i) => Ok(i.parse(response)?),
        }
    }
}

impl KeystoreInteraction for ExportExtendedPublicKey {
    fn is_supported(&self) -> bool {
        match self {
            ExportExtendedPublicKey::Coldcard(i) => i.is_supported(),
            ExportExtendedPublicKey::Custom(i) => i.is_supported(),
            ExportExtendedPublicKey::Hermit(i) => i.is_supported(),
            ExportExtendedPublicKey::Trezor(i) => i.is_supported(),
            ExportExtendedPublicKey::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            ExportExtendedPublicKey::Coldcard(i) => i.messages(),
            ExportExtendedPublicKey::Custom(i) => i.messages(),
            ExportExtendedPublicKey::Hermit(i) => i.messages(),
            ExportExtendedPublicKey::Trezor(i) => i.messages(),
            ExportExtendedPublicKey::Unsupported(i) => i.messages(),
        }
    }
}

#[cfg(test)]
mod test {
    use mwk_common::PARSE_ONLY;
    use mwk_test_util::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_routing() {
        let supported = [Keystore::Coldcard, Keystore::Trezor];
        for keystore in Keystore::ALL {
            let interaction =
                ExportPublicKey::new(keystore, Network::Testnet, "m/45'/0/0", false).unwrap();
            assert_eq!(
                interaction.kind() != InteractionKind::Unsupported,
                supported.contains(&keystore),
                "{keystore}"
            );
        }
        let supported = [
            Keystore::Coldcard,
            Keystore::Custom,
            Keystore::Hermit,
            Keystore::Trezor,
        ];
        for keystore in Keystore::ALL {
            let interaction =
                ExportExtendedPublicKey::new(keystore, Network::Testnet, "m/45'/0/0", false)
                    .unwrap();
            assert_eq!(
                interaction.kind() != InteractionKind::Unsupported,
                supported.contains(&keystore),
                "{keystore}"
            );
        }
    }

    #[test]
    fn test_unsupported() {
        let interaction =
            ExportPublicKey::new(Keystore::Hermit, Network::Testnet, "m/45'", false).unwrap();
        assert!(!interaction.is_supported());
        assert!(interaction.workflow().is_empty());
        let err = interaction.parse(json!({})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This keystore is not supported when exporting public keys."
        );
        assert_eq!(interaction.messages()[0].code, "unsupported");
    }

    #[test]
    fn test_indirect() {
        let interaction =
            ExportPublicKey::new(Keystore::Coldcard, Network::Testnet, "m/45'/0/0", false)
                .unwrap();
        assert_eq!(interaction.workflow(), PARSE_ONLY);
        let export = interaction.parse(coldcard_testnet_export()).unwrap();
        assert_eq!(export.public_key, MULTISIG_PUBKEY_1);
        assert!(interaction.request().is_err());

        let err = ExportExtendedPublicKey::new(Keystore::Custom, Network::Regtest, "m/45'", false)
            .unwrap_err();
        assert_eq!(err.to_string(), "Unknown network.");
    }

    #[test]
    fn test_direct_has_no_request() {
        let interaction =
            ExportExtendedPublicKey::new(Keystore::Trezor, Network::Testnet, "m/45'/0/0", true)
                .unwrap();
        assert_eq!(interaction.kind(), InteractionKind::Direct);
        let err = interaction.request().unwrap_err();
        assert_eq!(
            err.to_string(),
            "This interaction is direct and does not support a `request` method."
        );
    }
}
