use std::sync::Arc;

use async_trait::async_trait;
use mwk_common::{
    KeyDetails, KeystoreInteraction, MessageFilter, Network, SignedTransaction, State,
    UnsupportedInteraction, WorkflowStep,
};
use mwk_interactions::{
    ExportExtendedPublicKey, GetMetadata, InteractionKind, Keystore, SignMultisigTransaction,
    SignParams,
};
use mwk_test_util::*;
use mwk_trezor::{ConnectConfig, ConnectResponse, TrezorConnect, TrezorMethod};
use serde_json::{json, Value};

/// Signs every transaction with the fixture signature, rejects everything else
struct SigningBridge;

#[async_trait]
impl TrezorConnect for SigningBridge {
    async fn init(&self, _config: &ConnectConfig) -> Result<(), mwk_trezor::Error> {
        Ok(())
    }

    async fn call(
        &self,
        method: TrezorMethod,
        _params: Value,
    ) -> Result<ConnectResponse, mwk_trezor::Error> {
        Ok(match method {
            TrezorMethod::SignTransaction => {
                ConnectResponse::ok(json!({"signatures": [SIGNATURE_NO_SIGHASH]}))
            }
            _ => ConnectResponse::failure("Method not allowed"),
        })
    }
}

fn key_details() -> KeyDetails {
    KeyDetails {
        xfp: ROOT_FINGERPRINT.to_string(),
        path: "m/45'".to_string(),
    }
}

#[tokio::test]
async fn unsupported_interaction() {
    let interaction = UnsupportedInteraction::new("x", "y");
    assert!(!interaction.is_supported());
    let err = interaction.run::<()>().await.unwrap_err();
    assert_eq!(err.to_string(), "y");
    let err = interaction.request::<String>().unwrap_err();
    assert_eq!(err.to_string(), "y");
    let err = interaction.parse::<Value>(json!({})).unwrap_err();
    assert_eq!(err.to_string(), "y");
}

#[test]
fn coldcard_export_from_keystore_name() {
    init_logging();
    let keystore: Keystore = "coldcard".parse().unwrap();
    let interaction =
        ExportExtendedPublicKey::new(keystore, Network::Mainnet, "m/48'/0'/0'/2'/0/0", true)
            .unwrap();
    assert_eq!(interaction.kind(), InteractionKind::Indirect);
    for step in interaction.workflow() {
        assert_eq!(*step, WorkflowStep::Parse);
    }
    let export = interaction.parse(coldcard_mainnet_export()).unwrap();
    assert_eq!(
        export.xpub,
        derived_key("m/48'/0'/0'/2'/0/0").xpub.unwrap()
    );

    let interaction =
        ExportExtendedPublicKey::new(keystore, Network::Mainnet, "m/48'/0'/0'/2'/0'", true)
            .unwrap();
    assert!(!interaction.is_supported());
    assert!(interaction.has_messages_for(
        &MessageFilter::new()
            .state(State::Pending)
            .code("no_hardened_relative_path_error")
    ));
}

#[tokio::test]
async fn trezor_sign_through_factory() {
    init_logging();
    mwk_trezor::initialize_once(Arc::new(SigningBridge), ConnectConfig::default())
        .await
        .unwrap();

    let params = SignParams::from_psbt(Network::Testnet, UNSIGNED_PSBT, Some(key_details()));
    let interaction = SignMultisigTransaction::new(Keystore::Trezor, params.clone()).unwrap();
    assert_eq!(interaction.kind(), InteractionKind::Direct);
    let psbt = match interaction.run().await.unwrap() {
        SignedTransaction::Psbt(psbt) => psbt,
        other => panic!("expected a psbt, got {other:?}"),
    };
    let signatures = mwk_common::psbt::parse_signatures_from_psbt(&psbt).unwrap();
    assert_eq!(signatures.get(MULTISIG_PUBKEY_1).unwrap(), [SIGNATURE]);

    let interaction = SignMultisigTransaction::new(
        Keystore::Trezor,
        params.clone().return_signature_array(true),
    )
    .unwrap();
    assert_eq!(
        interaction.run().await.unwrap(),
        SignedTransaction::Signatures(vec![SIGNATURE.to_string()])
    );

    let err = GetMetadata::new(Keystore::Trezor).run().await.unwrap_err();
    assert_eq!(err.to_string(), "Method not allowed");

    // indirect interactions cannot be run
    let interaction = SignMultisigTransaction::new(Keystore::Coldcard, params).unwrap();
    let err = interaction.run().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "This interaction is indirect and does not support a `run` method."
    );
}
