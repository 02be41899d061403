use mwk_common::psbt::{
    parse_signatures_from_psbt, psbt_from_str, psbt_to_base64, unsigned_multisig_psbt,
};
use mwk_common::{
    IndirectKeystoreInteraction, KeystoreInteraction, Level, Message, MultisigInput,
    MultisigOutput, Network, SignatureSet, State, WorkflowStep, REQUEST_THEN_PARSE,
};
use serde_json::Value;

use crate::Error;

/// Exchange a PSBT with a Coldcard through the SD card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColdcardSignMultisigTransaction {
    network: Network,

    /// base64
    psbt: String,
}

impl ColdcardSignMultisigTransaction {
    /// Use `psbt` when given, otherwise build an unsigned one spending `inputs` to `outputs`
    pub fn new(
        network: Network,
        inputs: &[MultisigInput],
        outputs: &[MultisigOutput],
        psbt: Option<&str>,
    ) -> Result<Self, Error> {
        let psbt = match psbt {
            Some(psbt) => psbt_from_str(psbt)?,
            None => unsigned_multisig_psbt(network, inputs, outputs).map_err(|e| {
                tracing::warn!("cannot build the psbt: {e}");
                Error::UnableToBuildPsbt
            })?,
        };
        Ok(Self {
            network,
            psbt: psbt_to_base64(&psbt),
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }
}

impl KeystoreInteraction for ColdcardSignMultisigTransaction {
    fn messages(&self) -> Vec<Message> {
        let transfer = "Transfer the PSBT file to your Coldcard.";
        vec![
            Message::new(
                State::Pending,
                Level::Info,
                "coldcard.install_multisig_config",
                "Ensure your Coldcard has the multisig wallet installed.",
            ),
            Message::new(
                State::Pending,
                Level::Info,
                "coldcard.download_psbt",
                "Download and save this PSBT file to your SD card.",
            ),
            Message::new(State::Pending, Level::Info, "coldcard.transfer_psbt", transfer),
            Message::new(State::Active, Level::Info, "coldcard.transfer_psbt", transfer),
            Message::new(
                State::Active,
                Level::Info,
                "coldcard.select_psbt",
                "Choose 'Ready To Sign' and select the PSBT.",
            ),
            Message::new(
                State::Active,
                Level::Info,
                "coldcard.sign_psbt",
                "Verify the transaction details and sign.",
            ),
            Message::new(
                State::Active,
                Level::Info,
                "coldcard.upload_signed_psbt",
                "Upload the signed PSBT below.",
            ),
        ]
    }
}

impl IndirectKeystoreInteraction for ColdcardSignMultisigTransaction {
    type Request = String;
    type Output = SignatureSet;
    type Error = Error;

    fn workflow(&self) -> &'static [WorkflowStep] {
        REQUEST_THEN_PARSE
    }

    /// The PSBT to save on the SD card, base64 encoded
    fn request(&self) -> Result<String, Error> {
        Ok(self.psbt.clone())
    }

    /// Signatures found in the PSBT signed by the Coldcard
    fn parse(&self, signed_psbt: Value) -> Result<SignatureSet, Error> {
        let signed_psbt = signed_psbt.as_str().ok_or_else(|| {
            mwk_common::Error::InvalidPsbt("expected a base64 or hex string".to_string())
        })?;
        let signatures = parse_signatures_from_psbt(signed_psbt)?;
        if signatures.is_empty() {
            return Err(Error::NoSignatures);
        }
        Ok(signatures)
    }
}
