use mwk_common::keys::{parse_extended_public_key, public_key_hex, validate_root_fingerprint};
use mwk_common::path::{bip32_path_depth, validate_bip32_path};
use mwk_common::{
    ExtendedPublicKeyExport, IndirectKeystoreInteraction, KeystoreInteraction, Level, Message,
    Network, PathError, PathMode, State,
};
use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// What the user entered
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PastedKey {
    #[serde(default)]
    xpub: String,

    #[serde(default)]
    root_fingerprint: Option<String>,
}

/// Import an extended public key typed or pasted by the user.
///
/// Without a root fingerprint one is assigned deterministically: the last 8 hex characters
/// of the public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomExportExtendedPublicKey {
    network: Network,
    bip32_path: String,
    validation: Result<(), PathError>,
}

impl CustomExportExtendedPublicKey {
    pub fn new(network: Network, bip32_path: &str) -> Result<Self, Error> {
        if !matches!(network, Network::Mainnet | Network::Testnet) {
            return Err(mwk_common::Error::UnknownNetwork.into());
        }
        Ok(Self {
            network,
            bip32_path: bip32_path.to_string(),
            validation: validate_bip32_path(bip32_path, PathMode::Any),
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl KeystoreInteraction for CustomExportExtendedPublicKey {
    fn is_supported(&self) -> bool {
        self.validation.is_ok()
    }

    fn messages(&self) -> Vec<Message> {
        let mut messages = vec![];
        if let Err(e) = &self.validation {
            messages.push(Message::new(
                State::Pending,
                Level::Error,
                "custom.bip32_path.path_error",
                e.to_string(),
            ));
        }
        messages.push(Message::new(
            State::Pending,
            Level::Info,
            "custom.import_xpub",
            "Type or paste the extended public key here.",
        ));
        messages
    }
}

impl IndirectKeystoreInteraction for CustomExportExtendedPublicKey {
    type Request = ();
    type Output = ExtendedPublicKeyExport;
    type Error = Error;

    fn parse(&self, data: Value) -> Result<ExtendedPublicKeyExport, Error> {
        let pasted: PastedKey =
            serde_json::from_value(data).map_err(|_| Error::InvalidExtendedPublicKey)?;
        let xpub = parse_extended_public_key(pasted.xpub.trim()).map_err(|e| {
            tracing::debug!("rejecting pasted key: {e}");
            Error::InvalidExtendedPublicKey
        })?;

        let root_fingerprint = match pasted.root_fingerprint.filter(|f| !f.is_empty()) {
            Some(fingerprint) => {
                validate_root_fingerprint(&fingerprint)
                    .map_err(|e| Error::RootFingerprint(e.to_string().to_lowercase()))?;
                fingerprint
            }
            None => {
                let public_key = public_key_hex(&xpub);
                public_key[public_key.len() - 8..].to_string()
            }
        };

        let path_depth = bip32_path_depth(&self.bip32_path).map_err(mwk_common::Error::from)?;
        if usize::from(xpub.depth) != path_depth {
            return Err(Error::DepthMismatch {
                xpub: xpub.depth,
                path: path_depth,
            });
        }

        Ok(ExtendedPublicKeyExport {
            xpub: xpub.to_string(),
            root_fingerprint: Some(root_fingerprint),
            bip32_path: Some(self.bip32_path.clone()),
        })
    }
}

#[cfg(test)]
mod test {
    use mwk_common::{MessageFilter, PARSE_ONLY};
    use mwk_test_util::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse() {
        let interaction = CustomExportExtendedPublicKey::new(Network::Testnet, "m/45'").unwrap();
        assert_eq!(interaction.workflow(), PARSE_ONLY);

        let export = interaction
            .parse(json!({"xpub": TESTNET_P2SH_XPUB, "rootFingerprint": ROOT_FINGERPRINT}))
            .unwrap();
        assert_eq!(export.xpub, TESTNET_P2SH_XPUB);
        assert_eq!(export.root_fingerprint.as_deref(), Some(ROOT_FINGERPRINT));
        assert_eq!(export.bip32_path.as_deref(), Some("m/45'"));

        for data in [
            json!({"xpub": TESTNET_P2SH_XPUB}),
            json!({"xpub": TESTNET_P2SH_XPUB, "rootFingerprint": ""}),
            json!({"xpub": TESTNET_P2SH_XPUB, "rootFingerprint": null}),
        ] {
            let export = interaction.parse(data).unwrap();
            assert_eq!(
                export.root_fingerprint.unwrap(),
                P2SH_ROOT_PUBKEY[P2SH_ROOT_PUBKEY.len() - 8..]
            );
        }

        // the key is serialized with its plain prefix
        let export = interaction
            .parse(json!({"xpub": TESTNET_P2SH_UPUB, "rootFingerprint": ROOT_FINGERPRINT}))
            .unwrap();
        assert_eq!(export.xpub, TESTNET_P2SH_XPUB);
    }

    #[test]
    fn test_parse_errors() {
        let interaction = CustomExportExtendedPublicKey::new(Network::Testnet, "m/45'").unwrap();
        let err = interaction.parse(json!({"xpub": "tpub123"})).unwrap_err();
        assert_eq!(err.to_string(), "Not a valid ExtendedPublicKey.");
        assert!(interaction.parse(json!("not an object")).is_err());

        let err = interaction
            .parse(json!({"xpub": TESTNET_P2SH_XPUB, "rootFingerprint": "1234"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Root fingerprint validation error: expected hex value of length 8."
        );
        let err = interaction
            .parse(json!({"xpub": TESTNET_P2SH_XPUB, "rootFingerprint": "1234567z"}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Root fingerprint validation error: root fingerprint must be valid hex."
        );

        let interaction =
            CustomExportExtendedPublicKey::new(Network::Testnet, "m/45'/0'/0'").unwrap();
        let err = interaction
            .parse(json!({"xpub": TESTNET_P2SH_XPUB}))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Depth of ExtendedPublicKey (1) does not match depth of BIP32 path (3)."
        );
    }

    #[test]
    fn test_messages() {
        let err = CustomExportExtendedPublicKey::new(Network::Regtest, "m/45'").unwrap_err();
        assert_eq!(err.to_string(), "Unknown network.");

        let interaction = CustomExportExtendedPublicKey::new(Network::Mainnet, "m/45'").unwrap();
        assert!(interaction.is_supported());
        assert_eq!(interaction.messages().len(), 1);

        let interaction = CustomExportExtendedPublicKey::new(Network::Mainnet, "m/45'/x").unwrap();
        assert!(!interaction.is_supported());
        let message = interaction
            .message_for(&MessageFilter::new().level(Level::Error))
            .unwrap();
        assert_eq!(message.code, "custom.bip32_path.path_error");
        assert_eq!(message.text, "BIP32 path is invalid.");
    }
}
