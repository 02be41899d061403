use mwk_common::psbt::{
    parse_signatures_from_psbt, psbt_from_str, psbt_to_base64, unsigned_multisig_psbt,
};
use mwk_common::{
    IndirectKeystoreInteraction, KeystoreInteraction, Level, Message, MultisigInput,
    MultisigOutput, Network, SignatureSet, State, WorkflowStep, REQUEST_THEN_PARSE,
};
use serde_json::Value;

use crate::Error;

/// Sign a multisig transaction by exchanging PSBT files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomSignMultisigTransaction {
    network: Network,

    /// base64
    psbt: String,
}

impl CustomSignMultisigTransaction {
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

impl KeystoreInteraction for CustomSignMultisigTransaction {
    fn messages(&self) -> Vec<Message> {
        vec![
            Message::new(
                State::Pending,
                Level::Info,
                "custom.download_psbt",
                "Download and save this PSBT file.",
            ),
            Message::new(
                State::Pending,
                Level::Info,
                "custom.sign_psbt",
                "Add your signature to the PSBT.",
            ),
            Message::new(
                State::Active,
                Level::Info,
                "custom.sign_psbt",
                "Verify the transaction details and sign.",
            ),
            Message::new(
                State::Active,
                Level::Info,
                "custom.upload_signed_psbt",
                "Upload the signed PSBT.",
            ),
        ]
    }
}

impl IndirectKeystoreInteraction for CustomSignMultisigTransaction {
    type Request = String;
    type Output = SignatureSet;
    type Error = Error;

    fn workflow(&self) -> &'static [WorkflowStep] {
        REQUEST_THEN_PARSE
    }

    /// The PSBT to sign, base64 encoded
    fn request(&self) -> Result<String, Error> {
        Ok(self.psbt.clone())
    }

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

#[cfg(test)]
mod test {
    use mwk_common::MessageFilter;
    use mwk_test_util::*;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_sign() {
        let interaction =
            CustomSignMultisigTransaction::new(Network::Testnet, &[], &[], Some(SIGNED_PSBT_HEX))
                .unwrap();
        let request = psbt_from_str(&interaction.request().unwrap()).unwrap();
        assert_eq!(request, psbt_from_str(SIGNED_PSBT).unwrap());

        let signatures = interaction.parse(json!(SIGNED_PSBT)).unwrap();
        assert_eq!(signatures.get(MULTISIG_PUBKEY_1).unwrap(), [SIGNATURE]);

        let err = interaction.parse(json!(UNSIGNED_PSBT)).unwrap_err();
        assert!(matches!(err, Error::NoSignatures));
        assert!(interaction.parse(json!("not a psbt")).is_err());

        let err =
            CustomSignMultisigTransaction::new(Network::Testnet, &[], &[], None).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to build the PSBT from the provided parameters."
        );
    }

    #[test]
    fn test_messages() {
        let interaction =
            CustomSignMultisigTransaction::new(Network::Testnet, &[], &[], Some(UNSIGNED_PSBT))
                .unwrap();
        assert_eq!(interaction.workflow(), REQUEST_THEN_PARSE);
        assert_eq!(
            interaction
                .message_text_for(&MessageFilter::new().state(State::Pending).code("sign_psbt"))
                .unwrap(),
            "Add your signature to the PSBT."
        );
        assert_eq!(
            interaction
                .message_text_for(&MessageFilter::new().state(State::Active))
                .unwrap(),
            "Verify the transaction details and sign."
        );
    }
}
