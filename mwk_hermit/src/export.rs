use mwk_common::{
    ExtendedPublicKeyExport, IndirectKeystoreInteraction, KeystoreInteraction, Message,
};
use serde_json::Value;

use crate::descriptor::parse_descriptor_hex;
use crate::{hermit_messages, Error};

/// Read the extended public key shown by Hermit's `display-xpub` command.
///
/// The caller collects the QR code sequence with a [`crate::bcur::UrDecoder`] and hands the
/// decoded hex data to `parse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HermitExportExtendedPublicKey {
    bip32_path: String,
}

impl HermitExportExtendedPublicKey {
    pub fn new(bip32_path: &str) -> Self {
        Self {
            bip32_path: bip32_path.to_string(),
        }
    }
}

impl KeystoreInteraction for HermitExportExtendedPublicKey {
    fn messages(&self) -> Vec<Message> {
        hermit_messages(
            "Run the following Hermit command, replacing the BIP32 path if you need to:",
            &format!("display-xpub {}", self.bip32_path),
        )
    }
}

impl IndirectKeystoreInteraction for HermitExportExtendedPublicKey {
    type Request = ();
    type Output = ExtendedPublicKeyExport;
    type Error = Error;

    fn parse(&self, descriptor_hex: Value) -> Result<ExtendedPublicKeyExport, Error> {
        let descriptor_hex = descriptor_hex.as_str().unwrap_or_default();
        parse_descriptor_hex(descriptor_hex).map_err(|e| {
            tracing::warn!("cannot read the Hermit descriptor: {e}");
            e
        })
    }
}

#[cfg(test)]
mod test {
    use mwk_common::{Level, MessageFilter, State, PARSE_ONLY};
    use mwk_test_util::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_messages() {
        let interaction = HermitExportExtendedPublicKey::new("m/45'/1'/0'");
        assert!(interaction.is_supported());
        assert_eq!(interaction.workflow(), PARSE_ONLY);

        let messages = interaction.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].state, State::Active);
        assert_eq!(messages[0].code, "hermit.scanning");
        assert_eq!(messages[0].text, "Scan Hermit QR code sequence now.");

        let command = interaction
            .message_for(&MessageFilter::new().state(State::Pending).code("hermit.command"))
            .unwrap();
        assert_eq!(command.level, Level::Info);
        assert_eq!(
            command.text,
            "Run the following Hermit command, replacing the BIP32 path if you need to: 'display-xpub m/45'/1'/0''"
        );
        assert_eq!(command.extra("mode").unwrap(), "wallet");
        assert_eq!(command.extra("command").unwrap(), "display-xpub m/45'/1'/0'");
    }

    #[test]
    fn test_parse() {
        let interaction = HermitExportExtendedPublicKey::new("m/45'");
        let descriptor = format!("[{ROOT_FINGERPRINT}/45']{TESTNET_P2SH_XPUB}");
        let export = interaction
            .parse(json!(hex::encode(descriptor.as_bytes())))
            .unwrap();
        assert_eq!(
            serde_json::to_value(&export).unwrap(),
            json!({
                "xpub": TESTNET_P2SH_XPUB,
                "rootFingerprint": ROOT_FINGERPRINT,
                "bip32Path": "m/45'",
            })
        );

        let err = interaction.parse(json!(null)).unwrap_err();
        assert_eq!(err.to_string(), "No descriptor received from Hermit.");
        let err = interaction.parse(json!("")).unwrap_err();
        assert_eq!(err.to_string(), "No descriptor received from Hermit.");
        let err = interaction.parse(json!("deadbeef")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid descriptor received from Hermit.");
    }
}
