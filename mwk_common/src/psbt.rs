//! PSBT helpers for file and QR based signers.
//!
//! Only version 0 PSBTs are handled. Both base64 and hex encodings are accepted as input,
//! outputs are base64.

use std::str::FromStr;

use base64::engine::general_purpose;
use base64::Engine;
use bitcoin::absolute::LockTime;
use bitcoin::bip32::Fingerprint;
use bitcoin::psbt::{Input, Psbt};
use bitcoin::transaction::Version;
use bitcoin::{
    consensus, ecdsa, secp256k1, Address, Amount, OutPoint, PublicKey, ScriptBuf, Sequence,
    Transaction, TxIn, TxOut, Txid, Witness,
};

use crate::multisig::{
    AddressType, Bip32Derivation, KeyDetails, Multisig, MultisigInput, MultisigOutput,
};
use crate::path::{derivation_path, derivation_path_to_string, relative_bip32_sequence};
use crate::signature::normalize_signature;
use crate::{Error, Network, SignatureSet};

const PSBT_MAGIC_HEX: &str = "70736274ff";

/// Parse a PSBT encoded either in base64 or in hex
pub fn psbt_from_str(psbt: &str) -> Result<Psbt, Error> {
    let psbt = psbt.trim();
    let bytes = if psbt.to_lowercase().starts_with(PSBT_MAGIC_HEX) {
        hex::decode(psbt)?
    } else {
        general_purpose::STANDARD.decode(psbt)?
    };
    Ok(Psbt::deserialize(&bytes)?)
}

pub fn psbt_to_base64(psbt: &Psbt) -> String {
    general_purpose::STANDARD.encode(psbt.serialize())
}

pub fn psbt_to_hex(psbt: &Psbt) -> String {
    hex::encode(psbt.serialize())
}

pub fn psbt_hex_to_base64(psbt_hex: &str) -> Result<String, Error> {
    let bytes = hex::decode(psbt_hex.trim())?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

pub fn psbt_base64_to_hex(psbt_base64: &str) -> Result<String, Error> {
    let bytes = general_purpose::STANDARD.decode(psbt_base64.trim())?;
    Ok(hex::encode(bytes))
}

/// Every partial signature of `psbt`, keyed by the hex public key that made it
pub fn parse_signatures_from_psbt(psbt: &str) -> Result<SignatureSet, Error> {
    let psbt = psbt_from_str(psbt)?;
    let mut signatures = SignatureSet::new();
    for input in psbt.inputs.iter() {
        for (public_key, signature) in input.partial_sigs.iter() {
            signatures.push(&public_key.to_string(), hex::encode(signature.to_vec()));
        }
    }
    Ok(signatures)
}

/// Insert `signatures[i]`, made by `public_keys[i]`, in the i-th input of `psbt`
pub fn add_signatures_to_psbt(
    psbt: &str,
    public_keys: &[String],
    signatures: &[String],
) -> Result<String, Error> {
    let mut psbt = psbt_from_str(psbt)?;
    if public_keys.len() != signatures.len() || signatures.len() != psbt.inputs.len() {
        return Err(Error::SignatureCountMismatch {
            pubkeys: public_keys.len(),
            signatures: signatures.len(),
        });
    }
    for ((input, public_key), signature) in psbt.inputs.iter_mut().zip(public_keys).zip(signatures)
    {
        let key = PublicKey::from_str(public_key)
            .map_err(|_| Error::InvalidPublicKey(public_key.clone()))?;
        let normalized = normalize_signature(signature)?;
        let bytes = hex::decode(&normalized)?;
        let signature = ecdsa::Signature::from_slice(&bytes)
            .map_err(|_| Error::InvalidSignature(signature.clone()))?;
        input.partial_sigs.insert(key, signature);
    }
    Ok(psbt_to_base64(&psbt))
}

/// A PSBT split in the shapes expected by keystores that sign raw transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedPsbt {
    pub inputs: Vec<MultisigInput>,
    pub outputs: Vec<MultisigOutput>,

    /// The key of the signer in each input
    pub bip32_derivations: Vec<Bip32Derivation>,
}

/// Extract inputs, outputs and the derivations of the signer identified by `key_details`
pub fn translate_psbt(
    network: Network,
    psbt: &str,
    key_details: &KeyDetails,
) -> Result<TranslatedPsbt, Error> {
    let psbt = psbt_from_str(psbt)?;
    let tx = &psbt.unsigned_tx;
    let xfp = key_details.xfp.to_lowercase();

    let mut inputs = Vec::with_capacity(psbt.inputs.len());
    let mut bip32_derivations = Vec::with_capacity(psbt.inputs.len());
    for (idx, (txin, input)) in tx.input.iter().zip(psbt.inputs.iter()).enumerate() {
        let vout = txin.previous_output.vout;
        let amount = match (&input.non_witness_utxo, &input.witness_utxo) {
            (Some(prev_tx), _) => prev_tx.output.get(vout as usize).map(|o| o.value),
            (None, Some(prev_out)) => Some(prev_out.value),
            (None, None) => None,
        }
        .ok_or(Error::MissingPreviousOutput { idx })?;

        let (script, address_type) = match (&input.witness_script, &input.redeem_script) {
            (Some(witness), Some(_)) => (witness, AddressType::P2shP2wsh),
            (Some(witness), None) => (witness, AddressType::P2wsh),
            (None, Some(redeem)) => (redeem, AddressType::P2sh),
            (None, None) => return Err(Error::MissingMultisigScript { idx }),
        };
        let multisig = Multisig::from_script(script, address_type, network)?;

        let derivations: Vec<Bip32Derivation> = input
            .bip32_derivation
            .iter()
            .map(|(public_key, (fingerprint, path))| Bip32Derivation {
                public_key: hex::encode(public_key.serialize()),
                fingerprint: fingerprint.to_string(),
                path: derivation_path_to_string(path),
            })
            .collect();
        let signer = derivations
            .iter()
            .find(|d| {
                d.fingerprint == xfp && relative_bip32_sequence(&key_details.path, &d.path).is_ok()
            })
            .cloned()
            .ok_or(Error::MissingSigningKeyDetails)?;
        bip32_derivations.push(signer);

        inputs.push(MultisigInput {
            txid: txin.previous_output.txid.to_string(),
            index: vout,
            amount_sats: Some(amount.to_sat()),
            multisig,
            transaction_hex: input
                .non_witness_utxo
                .as_ref()
                .map(|prev_tx| hex::encode(consensus::serialize(prev_tx))),
            bip32_derivation: derivations,
        });
    }

    let outputs = tx
        .output
        .iter()
        .enumerate()
        .map(|(idx, txout)| {
            let address = Address::from_script(&txout.script_pubkey, network.bitcoin_network())
                .map_err(|_| Error::OutputWithoutAddress { idx })?;
            Ok(MultisigOutput {
                address: address.to_string(),
                amount_sats: txout.value.to_sat(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    tracing::debug!(
        "translated psbt with {} inputs and {} outputs",
        inputs.len(),
        outputs.len()
    );
    Ok(TranslatedPsbt {
        inputs,
        outputs,
        bip32_derivations,
    })
}

/// Build an unsigned version 2, RBF signaling PSBT spending multisig `inputs`
pub fn unsigned_multisig_psbt(
    network: Network,
    inputs: &[MultisigInput],
    outputs: &[MultisigOutput],
) -> Result<Psbt, Error> {
    if inputs.is_empty() || outputs.is_empty() {
        return Err(Error::InvalidPsbt(
            "at least one input and one output are required".to_string(),
        ));
    }
    let txins = inputs
        .iter()
        .map(|input| {
            let txid = Txid::from_str(&input.txid)
                .map_err(|e| Error::InvalidPsbt(format!("txid {}: {e}", input.txid)))?;
            Ok(TxIn {
                previous_output: OutPoint::new(txid, input.index),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::new(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;
    let txouts = outputs
        .iter()
        .map(|output| {
            let address = Address::from_str(&output.address)?
                .require_network(network.bitcoin_network())
                .map_err(|_| Error::AddressNetworkMismatch {
                    address: output.address.clone(),
                    network: network.to_string(),
                })?;
            Ok(TxOut {
                value: Amount::from_sat(output.amount_sats),
                script_pubkey: address.script_pubkey(),
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let tx = Transaction {
        version: Version::TWO,
        lock_time: LockTime::ZERO,
        input: txins,
        output: txouts,
    };
    let mut psbt = Psbt::from_unsigned_tx(tx)?;
    for (idx, (psbt_input, input)) in psbt.inputs.iter_mut().zip(inputs).enumerate() {
        fill_input(psbt_input, input, idx)?;
    }
    Ok(psbt)
}

/// Scripts, previous output and key origins of the `idx`-th input
fn fill_input(psbt_input: &mut Input, input: &MultisigInput, idx: usize) -> Result<(), Error> {
    let multisig = &input.multisig;
    psbt_input.redeem_script = multisig.redeem_script();
    psbt_input.witness_script = multisig.witness_script();

    let prev_tx = input
        .transaction_hex
        .as_deref()
        .map(|tx_hex| {
            let bytes = hex::decode(tx_hex.trim())?;
            consensus::deserialize::<Transaction>(&bytes)
                .map_err(|e| Error::InvalidPsbt(format!("input #{idx} transaction: {e}")))
        })
        .transpose()?;
    if multisig.address_type().is_segwit() {
        let prev_out = match (prev_tx, input.amount_sats) {
            (Some(prev_tx), _) => prev_tx.output.get(input.index as usize).cloned(),
            (None, Some(amount)) => Some(TxOut {
                value: Amount::from_sat(amount),
                script_pubkey: multisig.script_pubkey(),
            }),
            (None, None) => None,
        };
        psbt_input.witness_utxo = Some(prev_out.ok_or(Error::MissingPreviousOutput { idx })?);
    } else {
        psbt_input.non_witness_utxo = Some(prev_tx.ok_or(Error::MissingPreviousOutput { idx })?);
    }

    for derivation in input.bip32_derivation.iter() {
        let public_key = secp256k1::PublicKey::from_str(&derivation.public_key)
            .map_err(|_| Error::InvalidPublicKey(derivation.public_key.clone()))?;
        let fingerprint = hex::decode(&derivation.fingerprint).map_err(|_| Error::FingerprintHex)?;
        let fingerprint = <[u8; 4]>::try_from(fingerprint.as_slice())
            .map(Fingerprint::from)
            .map_err(|_| Error::FingerprintLength)?;
        let path = derivation_path(&derivation.path)?;
        psbt_input
            .bip32_derivation
            .insert(public_key, (fingerprint, path));
    }
    Ok(())
}
