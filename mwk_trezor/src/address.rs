use std::str::FromStr;

use bitcoin::{Address, PublicKey};
use mwk_common::{KeystoreInteraction, Level, Message, Multisig, Network, State};
use serde_json::{json, Value};

use crate::config::TrezorCoin;
use crate::connect::{dev_mode, TrezorMethod};
use crate::interaction::{
    bip32_path_messages, device_steps, trezor_messages, TrezorInteraction, TREZOR_RIGHT_BUTTON,
};
use crate::params::{script_type, trezor_multisig};
use crate::{impl_direct_interaction, Error};

/// Show a multisig address on the device so the user can compare it with the one displayed.
///
/// With a `public_key` the key at `bip32_path` is exported first, without display, and its
/// P2PKH address must match the one reported, proving the device holds one of the keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrezorConfirmMultisigAddress {
    network: Network,
    coin: TrezorCoin,
    bip32_path: String,
    multisig: Multisig,
    public_key: Option<String>,
}

impl TrezorConfirmMultisigAddress {
    pub fn new(
        network: Network,
        bip32_path: &str,
        multisig: Multisig,
        public_key: Option<String>,
    ) -> Self {
        Self {
            network,
            coin: TrezorCoin::new(network, dev_mode()),
            bip32_path: bip32_path.to_string(),
            multisig,
            public_key,
        }
    }

    fn check_public_key(&self, public_key: &str, payload: &Value) -> Result<(), Error> {
        let key = PublicKey::from_str(public_key)
            .map_err(|_| mwk_common::Error::InvalidPublicKey(public_key.to_string()))?;
        let expected = Address::p2pkh(key.pubkey_hash(), self.network.bitcoin_network()).to_string();
        let matches = [0, 1]
            .iter()
            .any(|i| payload[i]["address"].as_str() == Some(expected.as_str()));
        if matches {
            Ok(())
        } else {
            tracing::warn!("none of the exported addresses is {expected}");
            Err(Error::WrongPublicKey)
        }
    }
}

impl KeystoreInteraction for TrezorConfirmMultisigAddress {
    fn messages(&self) -> Vec<Message> {
        let mut messages = trezor_messages();
        messages.extend(bip32_path_messages(&self.bip32_path));
        let connect = if self.public_key.is_some() {
            format!(
                "Confirm in the Trezor Connect window that you want to \u{2018}Export multiple {} addresses\u{2019}. You may be prompted to enter your PIN. You may also receive a warning about your selected BIP32 path.",
                self.coin
            )
        } else {
            format!(
                "Confirm in the Trezor Connect window that you want to 'Export {} address'.  You may be prompted to enter your PIN.",
                self.coin
            )
        };
        messages.push(Message::new(
            State::Active,
            Level::Info,
            "trezor.connect.confirm_address",
            connect,
        ));
        messages.push(
            Message::new(
                State::Active,
                Level::Info,
                "trezor.confirm_address",
                "It is safe to continue and confirm the address on your Trezor device.",
            )
            .with_version("One")
            .with_extra(
                "messages",
                device_steps(&[
                    (
                        "Your Trezor device may display a warning \"Wrong address path for selected coin\".  It is safe to continue",
                        TREZOR_RIGHT_BUTTON,
                    ),
                    (
                        "Your Trezor device will display the multisig address and BIP32 path.",
                        TREZOR_RIGHT_BUTTON,
                    ),
                ]),
            ),
        );
        messages.push(
            Message::new(
                State::Active,
                Level::Info,
                "trezor.confirm_address",
                "Confirm the addresss on your Trezor device.",
            )
            .with_version("T")
            .with_extra(
                "messages",
                device_steps(&[
                    (
                        "For each signer in your quorum, your Trezor device will display a \"Confirm path\" dialogue displaying the signer's BIP32 path.  It is safe to continue",
                        TREZOR_RIGHT_BUTTON,
                    ),
                    (
                        "Your Trezor device will display the multisig address.",
                        TREZOR_RIGHT_BUTTON,
                    ),
                ]),
            ),
        );
        messages
    }
}

impl TrezorInteraction for TrezorConfirmMultisigAddress {
    type Output = Value;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        let address = self.multisig.address()?.to_string();
        let confirm = json!({
            "path": self.bip32_path,
            "address": address,
            "showOnTrezor": true,
            "coin": self.coin,
            "crossChain": true,
            "multisig": trezor_multisig(&self.multisig),
            "scriptType": script_type(self.multisig.address_type()),
        });
        let params = if self.public_key.is_some() {
            json!({
                "bundle": [
                    {
                        "path": self.bip32_path,
                        "showOnTrezor": false,
                        "coin": self.coin,
                        "crossChain": true,
                    },
                    confirm,
                ],
            })
        } else {
            confirm
        };
        Ok((TrezorMethod::GetAddress, params))
    }

    fn parse_payload(&self, payload: Value) -> Result<Value, Error> {
        if let Some(public_key) = &self.public_key {
            self.check_public_key(public_key, &payload)?;
        }
        Ok(payload)
    }
}

impl_direct_interaction!(TrezorConfirmMultisigAddress);

#[cfg(test)]
mod test {
    use mwk_common::{AddressType, MessageFilter};
    use mwk_test_util::*;

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
    fn test_connect_params() {
        let interaction = TrezorConfirmMultisigAddress::new(
            Network::Testnet,
            MULTISIG_SIGNING_PATH,
            multisig(),
            None,
        );
        let (method, params) = interaction.connect_params().unwrap();
        assert_eq!(method, TrezorMethod::GetAddress);
        assert_eq!(params["address"], MULTISIG_ADDRESS);
        assert_eq!(params["showOnTrezor"], true);
        assert_eq!(params["scriptType"], "SPENDMULTISIG");
        assert_eq!(params["multisig"]["pubkeys"].as_array().unwrap().len(), 2);

        let interaction = TrezorConfirmMultisigAddress::new(
            Network::Testnet,
            MULTISIG_SIGNING_PATH,
            multisig(),
            Some(MULTISIG_PUBKEY_1.to_string()),
        );
        let (_, params) = interaction.connect_params().unwrap();
        let bundle = params["bundle"].as_array().unwrap();
        assert_eq!(bundle[0]["showOnTrezor"], false);
        assert_eq!(bundle[1]["address"], MULTISIG_ADDRESS);
    }

    #[test]
    fn test_public_key_check() {
        let interaction = TrezorConfirmMultisigAddress::new(
            Network::Testnet,
            MULTISIG_SIGNING_PATH,
            multisig(),
            Some(MULTISIG_PUBKEY_1.to_string()),
        );
        let payload = json!([
            {"address": PUBKEY_1_TESTNET_P2PKH, "path": [0x8000_002d_u32, 0, 0]},
            {"address": MULTISIG_ADDRESS, "path": [0x8000_002d_u32, 0, 0]},
        ]);
        assert_eq!(interaction.parse_payload(payload.clone()).unwrap(), payload);

        let payload = json!([{"address": MULTISIG_ADDRESS}, {"address": MULTISIG_ADDRESS}]);
        let err = interaction.parse_payload(payload).unwrap_err();
        assert_eq!(err.to_string(), "Wrong public key specified");

        let interaction = TrezorConfirmMultisigAddress::new(
            Network::Testnet,
            MULTISIG_SIGNING_PATH,
            multisig(),
            None,
        );
        let payload = json!({"address": MULTISIG_ADDRESS});
        assert_eq!(interaction.parse_payload(payload.clone()).unwrap(), payload);
    }

    #[test]
    fn test_messages() {
        let interaction = TrezorConfirmMultisigAddress::new(
            Network::Testnet,
            MULTISIG_SIGNING_PATH,
            multisig(),
            None,
        );
        assert_eq!(
            interaction
                .message_text_for(&MessageFilter::new().code("trezor.connect.confirm_address"))
                .unwrap(),
            "Confirm in the Trezor Connect window that you want to 'Export Testnet address'.  You may be prompted to enter your PIN."
        );
        assert_eq!(
            interaction
                .message_text_for(&MessageFilter::new().code("^trezor.confirm_address").version("T"))
                .unwrap(),
            "Confirm the addresss on your Trezor device."
        );

        let interaction = TrezorConfirmMultisigAddress::new(
            Network::Mainnet,
            "m/45'/0/0",
            multisig(),
            Some(MULTISIG_PUBKEY_1.to_string()),
        );
        let text = interaction
            .message_text_for(&MessageFilter::new().code("connect.confirm_address"))
            .unwrap();
        assert!(text.contains("Export multiple Bitcoin addresses"));
    }
}
