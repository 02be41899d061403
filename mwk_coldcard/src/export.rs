use mwk_common::keys::{parse_extended_public_key, public_key_hex};
use mwk_common::{
    ExtendedPublicKeyExport, IndirectKeystoreInteraction, KeystoreInteraction, Level, Message,
    Network, PublicKeyExport, State,
};
use serde_json::Value;

use crate::chroot::{validate_coldcard_bip32_path, ColdcardPathError};
use crate::file::ColdcardXpubFile;
use crate::Error;

/// Shared by the interactions reading the file produced by `Export XPUB`
#[derive(Debug, Clone, PartialEq)]
struct XpubFileReader {
    network: Network,
    bip32_path: String,
    validation: Result<(), ColdcardPathError>,
}

impl XpubFileReader {
    fn new(network: Network, bip32_path: &str) -> Result<Self, Error> {
        if !matches!(network, Network::Mainnet | Network::Testnet) {
            return Err(mwk_common::Error::UnknownNetwork.into());
        }
        Ok(Self {
            network,
            bip32_path: bip32_path.to_string(),
            validation: validate_coldcard_bip32_path(bip32_path),
        })
    }

    fn messages(&self) -> Vec<Message> {
        let mut messages = vec![];
        if let Err(e) = &self.validation {
            messages.push(Message::new(
                State::Pending,
                Level::Error,
                e.code(),
                e.to_string(),
            ));
        }
        messages.push(Message::new(
            State::Pending,
            Level::Info,
            "coldcard.export_xpub",
            "Go to Settings > Multisig Wallets > Export XPUB",
        ));
        messages.push(Message::new(
            State::Pending,
            Level::Info,
            "coldcard.select_account",
            "Enter 0 for account",
        ));
        messages.push(Message::new(
            State::Pending,
            Level::Info,
            "coldcard.upload_key",
            "Upload the JSON file from your Coldcard.",
        ));
        messages
    }

    /// Root fingerprint and extended public key at the requested path
    fn read(&self, file: Value) -> Result<(String, String), Error> {
        self.validation.clone()?;
        let file = ColdcardXpubFile::parse(file)?;
        let xpub = file.extended_public_key(&self.bip32_path, self.network)?;
        Ok((file.root_fingerprint, xpub))
    }
}

/// Read a public key from an `Export XPUB` file, deriving it when below a chroot
#[derive(Debug, Clone, PartialEq)]
pub struct ColdcardExportPublicKey {
    reader: XpubFileReader,
}

impl ColdcardExportPublicKey {
    pub fn new(network: Network, bip32_path: &str) -> Result<Self, Error> {
        Ok(Self {
            reader: XpubFileReader::new(network, bip32_path)?,
        })
    }
}

impl KeystoreInteraction for ColdcardExportPublicKey {
    fn is_supported(&self) -> bool {
        self.reader.validation.is_ok()
    }

    fn messages(&self) -> Vec<Message> {
        self.reader.messages()
    }
}

impl IndirectKeystoreInteraction for ColdcardExportPublicKey {
    type Request = ();
    type Output = PublicKeyExport;
    type Error = Error;

    fn parse(&self, file: Value) -> Result<PublicKeyExport, Error> {
        let (root_fingerprint, xpub) = self.reader.read(file)?;
        let xpub = parse_extended_public_key(&xpub)?;
        Ok(PublicKeyExport {
            public_key: public_key_hex(&xpub),
            root_fingerprint: Some(root_fingerprint),
            bip32_path: Some(self.reader.bip32_path.clone()),
        })
    }
}

/// Read an extended public key from an `Export XPUB` file, deriving it when below a chroot
#[derive(Debug, Clone, PartialEq)]
pub struct ColdcardExportExtendedPublicKey {
    reader: XpubFileReader,
}

impl ColdcardExportExtendedPublicKey {
    pub fn new(network: Network, bip32_path: &str) -> Result<Self, Error> {
        Ok(Self {
            reader: XpubFileReader::new(network, bip32_path)?,
        })
    }
}

impl KeystoreInteraction for ColdcardExportExtendedPublicKey {
    fn is_supported(&self) -> bool {
        self.reader.validation.is_ok()
    }

    fn messages(&self) -> Vec<Message> {
        self.reader.messages()
    }
}

impl IndirectKeystoreInteraction for ColdcardExportExtendedPublicKey {
    type Request = ();
    type Output = ExtendedPublicKeyExport;
    type Error = Error;

    fn parse(&self, file: Value) -> Result<ExtendedPublicKeyExport, Error> {
        let (root_fingerprint, xpub) = self.reader.read(file)?;
        Ok(ExtendedPublicKeyExport {
            xpub,
            root_fingerprint: Some(root_fingerprint),
            bip32_path: Some(self.reader.bip32_path.clone()),
        })
    }
}

#[cfg(test)]
mod test {
    use mwk_common::{MessageFilter, PARSE_ONLY};
    use mwk_test_util::*;

    use super::*;

    #[test]
    fn test_unknown_network() {
        let err = ColdcardExportPublicKey::new(Network::Regtest, "m/45'").unwrap_err();
        assert_eq!(err.to_string(), "Unknown network.");
        let err = ColdcardExportExtendedPublicKey::new(Network::Signet, "m/45'").unwrap_err();
        assert_eq!(err.to_string(), "Unknown network.");
    }

    #[test]
    fn test_messages() {
        let interaction = ColdcardExportPublicKey::new(Network::Testnet, "m/45'/0/0").unwrap();
        assert!(interaction.is_supported());
        assert_eq!(interaction.workflow(), PARSE_ONLY);
        let codes: Vec<String> = interaction.messages().into_iter().map(|m| m.code).collect();
        assert_eq!(
            codes,
            [
                "coldcard.export_xpub",
                "coldcard.select_account",
                "coldcard.upload_key"
            ]
        );

        let interaction =
            ColdcardExportExtendedPublicKey::new(Network::Testnet, "m/45'/0'").unwrap();
        assert!(!interaction.is_supported());
        let first = &interaction.messages()[0];
        assert_eq!(first.state, State::Pending);
        assert_eq!(first.level, Level::Error);
        assert_eq!(
            first.code,
            "coldcard.bip32_path.no_hardened_relative_path_error"
        );
        assert!(!interaction.has_messages_for(
            &MessageFilter::new()
                .state(State::Pending)
                .level(Level::Error)
                .code("unknown_chroot")
        ));
    }

    #[test]
    fn test_export_public_key() {
        let interaction = ColdcardExportPublicKey::new(Network::Testnet, "m/45'/0/0").unwrap();
        let export = interaction.parse(coldcard_testnet_export()).unwrap();
        assert_eq!(export.public_key, derived_key("m/45'/0/0").public_key);
        assert_eq!(export.root_fingerprint.as_deref(), Some(ROOT_FINGERPRINT));
        assert_eq!(export.bip32_path.as_deref(), Some("m/45'/0/0"));

        let interaction = ColdcardExportPublicKey::new(Network::Testnet, "m/45'").unwrap();
        let export = interaction.parse(coldcard_testnet_export()).unwrap();
        assert_eq!(export.public_key, P2SH_ROOT_PUBKEY);
    }

    #[test]
    fn test_export_extended_public_key() {
        let interaction =
            ColdcardExportExtendedPublicKey::new(Network::Mainnet, "m/48'/0'/0'/2'/0/0").unwrap();
        let export = interaction.parse(coldcard_mainnet_export()).unwrap();
        assert_eq!(
            export.xpub,
            derived_key("m/48'/0'/0'/2'/0/0").xpub.unwrap()
        );
        assert_eq!(export.root_fingerprint.as_deref(), Some(ROOT_FINGERPRINT));

        let interaction =
            ColdcardExportExtendedPublicKey::new(Network::Mainnet, "m/48'/0'/0'/2'").unwrap();
        let export = interaction.parse(coldcard_mainnet_export()).unwrap();
        assert_eq!(export.xpub, MAINNET_P2WSH_XPUB_CONVERTED);
    }

    #[test]
    fn test_invalid_path_fails_parse() {
        let interaction = ColdcardExportExtendedPublicKey::new(Network::Testnet, "m/44'").unwrap();
        let err = interaction.parse(coldcard_testnet_export()).unwrap_err();
        assert!(matches!(err, Error::Bip32Path(ColdcardPathError::UnknownChroot)));
    }
}
