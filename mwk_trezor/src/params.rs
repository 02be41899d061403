//! Shapes of the multisig parameters expected by Trezor Connect

use mwk_common::path::bip32_path_to_sequence;
use mwk_common::{AddressType, Multisig, MultisigInput, MultisigOutput};
use serde_json::{json, Value};

use crate::Error;

pub fn script_type(address_type: AddressType) -> &'static str {
    match address_type {
        AddressType::P2sh => "SPENDMULTISIG",
        AddressType::P2shP2wsh => "SPENDP2SHWITNESS",
        AddressType::P2wsh => "SPENDWITNESS",
    }
}

/// Trezor only needs the public key of the other signers, the rest of the node is zeroed
pub fn trezor_public_key(public_key: &str) -> Value {
    json!({
        "address_n": [],
        "node": {
            "depth": 0,
            "child_num": 0,
            "fingerprint": 0,
            "chain_code": "0".repeat(64),
            "public_key": public_key,
        },
    })
}

pub fn trezor_multisig(multisig: &Multisig) -> Value {
    let pubkeys: Vec<Value> = multisig
        .public_keys()
        .iter()
        .map(|k| trezor_public_key(k))
        .collect();
    json!({
        "m": multisig.required_signers(),
        "pubkeys": pubkeys,
    })
}

pub fn trezor_input(input: &MultisigInput, bip32_path: &str) -> Result<Value, Error> {
    let multisig = &input.multisig;
    let mut trezor_multisig = trezor_multisig(multisig);
    trezor_multisig["signatures"] = json!(vec![""; multisig.total_signers()]);
    let mut result = json!({
        "script_type": script_type(multisig.address_type()),
        "multisig": trezor_multisig,
        "prev_hash": input.txid,
        "prev_index": input.index,
        "address_n": bip32_path_to_sequence(bip32_path).map_err(mwk_common::Error::from)?,
    });
    if let Some(amount) = input.amount_sats {
        result["amount"] = json!(amount.to_string());
    }
    Ok(result)
}

pub fn trezor_output(output: &MultisigOutput) -> Value {
    json!({
        "amount": output.amount_sats.to_string(),
        "address": output.address,
        "script_type": "PAYTOADDRESS",
    })
}

#[cfg(test)]
mod test {
    use mwk_common::Network;
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
    fn test_input() {
        let input = MultisigInput {
            txid: FUNDING_TXID.to_string(),
            index: 0,
            amount_sats: Some(FUNDING_AMOUNT),
            multisig: multisig(),
            transaction_hex: None,
            bip32_derivation: vec![],
        };
        let value = trezor_input(&input, MULTISIG_SIGNING_PATH).unwrap();
        assert_eq!(value["script_type"], "SPENDMULTISIG");
        assert_eq!(value["multisig"]["m"], 2);
        assert_eq!(value["multisig"]["signatures"], json!(["", ""]));
        assert_eq!(
            value["multisig"]["pubkeys"][1]["node"]["public_key"],
            MULTISIG_PUBKEY_2
        );
        assert_eq!(value["address_n"], json!([0x8000002du32, 0, 0]));
        assert_eq!(value["amount"], "100000");

        let input = MultisigInput {
            amount_sats: None,
            ..input
        };
        let value = trezor_input(&input, MULTISIG_SIGNING_PATH).unwrap();
        assert!(value.get("amount").is_none());
        assert!(trezor_input(&input, "45'/0").is_err());
    }

    #[test]
    fn test_public_key_and_output() {
        let node = &trezor_public_key(MULTISIG_PUBKEY_1)["node"];
        assert_eq!(node["chain_code"].as_str().unwrap().len(), 64);
        assert_eq!(node["depth"], 0);

        let output = MultisigOutput {
            address: DESTINATION_ADDRESS.to_string(),
            amount_sats: DESTINATION_AMOUNT,
        };
        assert_eq!(
            trezor_output(&output),
            json!({
                "amount": "90000",
                "address": DESTINATION_ADDRESS,
                "script_type": "PAYTOADDRESS",
            })
        );
        assert_eq!(script_type(AddressType::P2wsh), "SPENDWITNESS");
    }
}
