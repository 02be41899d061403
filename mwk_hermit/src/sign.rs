use mwk_common::psbt::{parse_signatures_from_psbt, psbt_base64_to_hex, psbt_hex_to_base64};
use mwk_common::{
    uri_qr, IndirectKeystoreInteraction, KeystoreInteraction, Level, Message, SignedTransaction,
    State, WorkflowStep, REQUEST_THEN_PARSE,
};
use serde_json::Value;

use crate::bcur::UrEncoder;
use crate::{hermit_messages, Error};

/// Show a PSBT to Hermit's `sign` command as a QR code sequence and read back the signed PSBT
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HermitSignMultisigTransaction {
    /// base64
    psbt: Option<String>,

    return_signature_array: bool,
}

impl HermitSignMultisigTransaction {
    /// When `return_signature_array` is set `parse` returns the signatures of the first
    /// signing key instead of the signed PSBT
    pub fn new(psbt: Option<&str>, return_signature_array: bool) -> Self {
        Self {
            psbt: psbt.filter(|p| !p.is_empty()).map(str::to_string),
            return_signature_array,
        }
    }

    /// The parts returned by `request`, each rendered as a BMP data URI
    pub fn request_qr(&self, pixel_per_module: Option<u8>) -> Result<Vec<String>, Error> {
        self.request()?
            .iter()
            .map(|part| uri_qr(part, pixel_per_module).map_err(Error::from))
            .collect()
    }

    fn signed_transaction(&self, signed_psbt_hex: &str) -> Option<SignedTransaction> {
        if signed_psbt_hex.is_empty() {
            return None;
        }
        if self.return_signature_array {
            let signatures = parse_signatures_from_psbt(signed_psbt_hex).ok()?;
            Some(SignedTransaction::Signatures(signatures.first()?.to_vec()))
        } else {
            let psbt = psbt_hex_to_base64(signed_psbt_hex).ok()?;
            Some(SignedTransaction::Psbt(psbt))
        }
    }
}

impl KeystoreInteraction for HermitSignMultisigTransaction {
    fn messages(&self) -> Vec<Message> {
        let mut messages = hermit_messages(
            "Run the following Hermit command to scan this signature request:",
            "sign",
        );
        if self.psbt.is_none() {
            messages.push(Message::new(
                State::Pending,
                Level::Error,
                "hermit.sign",
                Error::PsbtRequired.to_string(),
            ));
        }
        messages
    }
}

impl IndirectKeystoreInteraction for HermitSignMultisigTransaction {
    type Request = Vec<String>;
    type Output = SignedTransaction;
    type Error = Error;

    fn workflow(&self) -> &'static [WorkflowStep] {
        REQUEST_THEN_PARSE
    }

    /// UR parts carrying the unsigned PSBT
    fn request(&self) -> Result<Vec<String>, Error> {
        let psbt = self.psbt.as_deref().ok_or(Error::PsbtRequired)?;
        let encoder = UrEncoder::new(&psbt_base64_to_hex(psbt)?)?;
        Ok(encoder.parts()?)
    }

    /// `signed_psbt_hex` is the data decoded from the QR code sequence shown by Hermit
    fn parse(&self, signed_psbt_hex: Value) -> Result<SignedTransaction, Error> {
        let signed_psbt_hex = signed_psbt_hex.as_str().unwrap_or_default();
        self.signed_transaction(signed_psbt_hex).ok_or_else(|| {
            tracing::warn!("cannot read a signed PSBT from Hermit");
            Error::NoSignature
        })
    }
}
