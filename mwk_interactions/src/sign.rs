use mwk_coldcard::ColdcardSignMultisigTransaction;
use mwk_common::{
    IndirectKeystoreInteraction, KeyDetails, KeystoreInteraction, Message, MultisigInput,
    MultisigOutput, Network, SignedTransaction, UnsupportedInteraction, WorkflowStep,
};
use mwk_custom::CustomSignMultisigTransaction;
use mwk_hermit::HermitSignMultisigTransaction;
use mwk_trezor::TrezorSignMultisigTransaction;
use serde_json::Value;

use crate::interaction::{
    parse_direct, parse_indirect, request_direct, request_indirect, run_direct, run_indirect,
    unsupported,
};
use crate::{Error, InteractionKind, Keystore};

/// What to sign: a PSBT, or inputs and outputs with the signing path of each input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignParams {
    pub network: Network,
    pub inputs: Vec<MultisigInput>,
    pub outputs: Vec<MultisigOutput>,

    /// One per input
    pub bip32_paths: Vec<String>,

    /// base64 or hex
    pub psbt: Option<String>,

    /// Identify the signer in the PSBT, for keystores signing raw inputs
    pub key_details: Option<KeyDetails>,

    /// Return the signatures instead of the PSBT including them
    pub return_signature_array: bool,
}

impl SignParams {
    pub fn from_psbt(network: Network, psbt: &str, key_details: Option<KeyDetails>) -> Self {
        Self {
            network,
            inputs: vec![],
            outputs: vec![],
            bip32_paths: vec![],
            psbt: Some(psbt.to_string()),
            key_details,
            return_signature_array: false,
        }
    }

    pub fn from_parts(
        network: Network,
        inputs: Vec<MultisigInput>,
        outputs: Vec<MultisigOutput>,
        bip32_paths: Vec<String>,
    ) -> Self {
        Self {
            network,
            inputs,
            outputs,
            bip32_paths,
            psbt: None,
            key_details: None,
            return_signature_array: false,
        }
    }

    pub fn return_signature_array(mut self, return_signature_array: bool) -> Self {
        self.return_signature_array = return_signature_array;
        self
    }
}

/// Sign a multisig transaction
#[derive(Debug, Clone, PartialEq)]
pub enum SignMultisigTransaction {
    Coldcard(ColdcardSignMultisigTransaction),
    Custom(CustomSignMultisigTransaction),
    Hermit(HermitSignMultisigTransaction),
    Trezor(TrezorSignMultisigTransaction),
    Unsupported(UnsupportedInteraction),
}

impl SignMultisigTransaction {
    pub fn new(keystore: Keystore, params: SignParams) -> Result<Self, Error> {
        let psbt = params.psbt.as_deref().filter(|p| !p.is_empty());
        Ok(match keystore {
            Keystore::Coldcard => SignMultisigTransaction::Coldcard(
                ColdcardSignMultisigTransaction::new(
                    params.network,
                    &params.inputs,
                    &params.outputs,
                    psbt,
                )?,
            ),
            Keystore::Custom => {
                SignMultisigTransaction::Custom(CustomSignMultisigTransaction::new(
                    params.network,
                    &params.inputs,
                    &params.outputs,
                    psbt,
                )?)
            }
            Keystore::Hermit => SignMultisigTransaction::Hermit(
                HermitSignMultisigTransaction::new(psbt, params.return_signature_array),
            ),
            Keystore::Trezor => {
                let interaction = match psbt {
                    Some(psbt) => {
                        let key_details =
                            params.key_details.as_ref().ok_or(Error::MissingKeyDetails)?;
                        TrezorSignMultisigTransaction::from_psbt(
                            params.network,
                            psbt,
                            key_details,
                            params.return_signature_array,
                        )?
                    }
                    None => TrezorSignMultisigTransaction::new(
                        params.network,
                        params.inputs,
                        params.outputs,
                        params.bip32_paths,
                    ),
                };
                SignMultisigTransaction::Trezor(interaction)
            }
            _ => SignMultisigTransaction::Unsupported(unsupported(
                "This keystore is not supported when signing multisig transactions.",
            )),
        })
    }

    pub fn kind(&self) -> InteractionKind {
        match self {
            SignMultisigTransaction::Trezor(_) => InteractionKind::Direct,
            SignMultisigTransaction::Unsupported(_) => InteractionKind::Unsupported,
            _ => InteractionKind::Indirect,
        }
    }

    pub fn workflow(&self) -> &'static [WorkflowStep] {
        match self {
            SignMultisigTransaction::Coldcard(i) => i.workflow(),
            SignMultisigTransaction::Custom(i) => i.workflow(),
            SignMultisigTransaction::Hermit(i) => i.workflow(),
            _ => &[],
        }
    }

    pub async fn run(&self) -> Result<SignedTransaction, Error> {
        match self {
            SignMultisigTransaction::Coldcard(i) => {
                run_indirect(i).await.map(SignedTransaction::SignatureSet)
            }
            SignMultisigTransaction::Custom(i) => {
                run_indirect(i).await.map(SignedTransaction::SignatureSet)
            }
            SignMultisigTransaction::Hermit(i) => run_indirect(i).await,
            SignMultisigTransaction::Trezor(i) => run_direct(i).await,
            SignMultisigTransaction::Unsupported(i) => Ok(i.run().await?),
        }
    }

    /// The PSBT (base64) for file based keystores, the UR parts for Hermit
    pub fn request(&self) -> Result<Value, Error> {
        match self {
            SignMultisigTransaction::Coldcard(i) => request_indirect(i),
            SignMultisigTransaction::Custom(i) => request_indirect(i),
            SignMultisigTransaction::Hermit(i) => request_indirect(i),
            SignMultisigTransaction::Trezor(i) => request_direct(i),
            SignMultisigTransaction::Unsupported(i) => Ok(i.request()?),
        }
    }

    pub fn parse(&self, response: Value) -> Result<SignedTransaction, Error> {
        match self {
            SignMultisigTransaction::Coldcard(i) => {
                parse_indirect(i, response).map(SignedTransaction::SignatureSet)
            }
            SignMultisigTransaction::Custom(i) => {
                parse_indirect(i, response).map(SignedTransaction::SignatureSet)
            }
            SignMultisigTransaction::Hermit(i) => parse_indirect(i, response),
            SignMultisigTransaction::Trezor(i) => parse_direct(i, response),
            SignMultisigTransaction::Unsupported(i) => Ok(i.parse(response)?),
        }
    }
}

impl KeystoreInteraction for SignMultisigTransaction {
    fn is_supported(&self) -> bool {
        match self {
            SignMultisigTransaction::Coldcard(i) => i.is_supported(),
            SignMultisigTransaction::Custom(i) => i.is_supported(),
            SignMultisigTransaction::Hermit(i) => i.is_supported(),
            SignMultisigTransaction::Trezor(i) => i.is_supported(),
            SignMultisigTransaction::Unsupported(i) => i.is_supported(),
        }
    }

    fn messages(&self) -> Vec<Message> {
        match self {
            SignMultisigTransaction::Coldcard(i) => i.messages(),
            SignMultisigTransaction::Custom(i) => i.messages(),
            SignMultisigTransaction::Hermit(i) => i.messages(),
            SignMultisigTransaction::Trezor(i) => i.messages(),
            SignMultisigTransaction::Unsupported(i) => i.messages(),
        }
    }
}
