use mwk_common::psbt::{add_signatures_to_psbt, translate_psbt};
use mwk_common::{
    IndirectKeystoreInteraction, KeyDetails, KeystoreInteraction, MessageFilter, Network,
    WorkflowStep,
};
use mwk_custom::{CustomExportExtendedPublicKey, CustomSignMultisigTransaction};
use mwk_test_util::*;
use serde_json::json;

#[test]
fn import_then_sign() {
    init_logging();

    let import = CustomExportExtendedPublicKey::new(Network::Testnet, "m/45'/0").unwrap();
    assert!(import.has_messages_for(&MessageFilter::new().code("custom.import_xpub")));
    let key = import
        .parse(json!({"xpub": derived_key("m/45'/0").tpub, "rootFingerprint": ROOT_FINGERPRINT}))
        .unwrap();
    assert_eq!(key.xpub, derived_key("m/45'/0").tpub);

    // the transaction is given as inputs and outputs, the PSBT is built for the user
    let key_details = KeyDetails {
        xfp: ROOT_FINGERPRINT.to_string(),
        path: "m/45'".to_string(),
    };
    let translated = translate_psbt(Network::Testnet, UNSIGNED_PSBT, &key_details).unwrap();
    let sign = CustomSignMultisigTransaction::new(
        Network::Testnet,
        &translated.inputs,
        &translated.outputs,
        None,
    )
    .unwrap();

    let mut psbt = String::new();
    for step in sign.workflow() {
        match step {
            WorkflowStep::Request => psbt = sign.request().unwrap(),
            WorkflowStep::Parse => {
                let signed = add_signatures_to_psbt(
                    &psbt,
                    &[MULTISIG_PUBKEY_1.to_string()],
                    &[SIGNATURE_NO_SIGHASH.to_string()],
                )
                .unwrap();
                let signatures = sign.parse(json!(signed)).unwrap();
                assert_eq!(signatures.get(MULTISIG_PUBKEY_1).unwrap(), [SIGNATURE]);
            }
        }
    }
}
