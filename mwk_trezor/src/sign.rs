use mwk_common::psbt::{add_signatures_to_psbt, psbt_from_str, psbt_to_base64, translate_psbt};
use mwk_common::signature::parse_signatures;
use mwk_common::{
    KeyDetails, KeystoreInteraction, Level, Message, MultisigInput, MultisigOutput, Network,
    SignedTransaction, State,
};
use serde_json::{json, Value};

use crate::config::TrezorCoin;
use crate::connect::{dev_mode, TrezorMethod};
use crate::interaction::{
    device_steps, trezor_messages, TrezorInteraction, TREZOR_PUSH_AND_HOLD_BUTTON,
    TREZOR_RIGHT_BUTTON,
};
use crate::params::{trezor_input, trezor_output};
use crate::{impl_direct_interaction, Error};

/// The PSBT a transaction was translated from, to put the signatures back in
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourcePsbt {
    /// base64
    psbt: String,

    /// The signing key of each input
    public_keys: Vec<String>,

    return_signature_array: bool,
}

/// Sign the inputs of a multisig transaction, one BIP32 path per input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrezorSignMultisigTransaction {
    network: Network,
    coin: TrezorCoin,
    inputs: Vec<MultisigInput>,
    outputs: Vec<MultisigOutput>,
    bip32_paths: Vec<String>,
    source: Option<SourcePsbt>,
}

impl TrezorSignMultisigTransaction {
    pub fn new(
        network: Network,
        inputs: Vec<MultisigInput>,
        outputs: Vec<MultisigOutput>,
        bip32_paths: Vec<String>,
    ) -> Self {
        Self {
            network,
            coin: TrezorCoin::new(network, dev_mode()),
            inputs,
            outputs,
            bip32_paths,
            source: None,
        }
    }

    /// Sign the inputs of `psbt` where the signer identified by `key_details` takes part.
    ///
    /// The result is the PSBT with the new signatures unless `return_signature_array`.
    pub fn from_psbt(
        network: Network,
        psbt: &str,
        key_details: &KeyDetails,
        return_signature_array: bool,
    ) -> Result<Self, Error> {
        let translated = translate_psbt(network, psbt, key_details)?;
        let (bip32_paths, public_keys) = translated
            .bip32_derivations
            .into_iter()
            .map(|d| (d.path, d.public_key))
            .unzip();
        let mut interaction =
            Self::new(network, translated.inputs, translated.outputs, bip32_paths);
        interaction.source = Some(SourcePsbt {
            psbt: psbt_to_base64(&psbt_from_str(psbt)?),
            public_keys,
            return_signature_array,
        });
        Ok(interaction)
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl KeystoreInteraction for TrezorSignMultisigTransaction {
    fn messages(&self) -> Vec<Message> {
        let mut messages = trezor_messages();
        messages.push(Message::new(
            State::Active,
            Level::Info,
            "trezor.connect.sign",
            format!(
                "Confirm in the Trezor Connect window that you want to 'Sign {} transaction'.  You may be prompted to enter your PIN.",
                self.network
            ),
        ));
        let confirm = "Confirm each output on your Trezor device and approve the transaction.";
        messages.push(
            Message::new(State::Active, Level::Info, "trezor.sign", confirm)
                .with_version("One")
                .with_extra(
                    "messages",
                    device_steps(&[
                        (
                            "For each output, your Trezor device will display the output amount and address.",
                            TREZOR_RIGHT_BUTTON,
                        ),
                        (
                            "Your Trezor device will display the total output amounts and fee amount.",
                            TREZOR_RIGHT_BUTTON,
                        ),
                    ]),
                ),
        );
        messages.push(
            Message::new(State::Active, Level::Info, "trezor.sign", confirm)
                .with_version("T")
                .with_extra(
                    "messages",
                    device_steps(&[
                        (
                            "For each input, your Trezor device will display a \"Confirm path\" dialogue displaying the input BIP32 path.  It is safe to continue",
                            TREZOR_RIGHT_BUTTON,
                        ),
                        (
                            "For each output, your Trezor device will display a \"Confirm sending\" dialogue displaying the output amount and address.",
                            TREZOR_RIGHT_BUTTON,
                        ),
                        (
                            "Your Trezor device will display the \"Confirm transaction\" dialogue displaying the total output amount and fee amount.",
                            TREZOR_PUSH_AND_HOLD_BUTTON,
                        ),
                    ]),
                ),
        );
        messages
    }
}

impl TrezorInteraction for TrezorSignMultisigTransaction {
    type Output = SignedTransaction;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        let inputs = self
            .inputs
            .iter()
            .enumerate()
            .map(|(i, input)| {
                let path = self.bip32_paths.get(i).ok_or(Error::MissingBip32Path(i))?;
                trezor_input(input, path)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let outputs: Vec<Value> = self.outputs.iter().map(trezor_output).collect();
        Ok((
            TrezorMethod::SignTransaction,
            json!({
                "inputs": inputs,
                "outputs": outputs,
                "coin": self.coin,
            }),
        ))
    }

    fn parse_payload(&self, payload: Value) -> Result<SignedTransaction, Error> {
        let signatures: Vec<String> = serde_json::from_value(
            payload
                .get("signatures")
                .cloned()
                .ok_or(Error::MissingPayloadField("signatures"))?,
        )?;
        let signatures = parse_signatures(&signatures)?;
        match &self.source {
            Some(source) if !source.return_signature_array => Ok(SignedTransaction::Psbt(
                add_signatures_to_psbt(&source.psbt, &source.public_keys, &signatures)?,
            )),
            _ => Ok(SignedTransaction::Signatures(signatures)),
        }
    }
}

impl_direct_interaction!(TrezorSignMultisigTransaction);
