use mwk_coldcard::{
    ColdcardExportExtendedPublicKey, ColdcardExportPublicKey, ColdcardSignMultisigTransaction,
};
use mwk_common::psbt::{add_signatures_to_psbt, parse_signatures_from_psbt};
use mwk_common::{
    IndirectKeystoreInteraction, KeystoreInteraction, MessageFilter, Network, State,
    WorkflowStep,
};
use mwk_test_util::*;
use serde_json::json;

#[test]
fn export_then_sign() {
    init_logging();

    // the coordinator imports the key of the Coldcard from the uploaded file
    let export = ColdcardExportExtendedPublicKey::new(Network::Testnet, "m/45'/0/0").unwrap();
    for step in export.workflow() {
        assert_eq!(*step, WorkflowStep::Parse);
    }
    let file = coldcard_testnet_export().to_string();
    let key = export.parse(json!(file)).unwrap();
    assert_eq!(key.xpub, derived_key("m/45'/0/0").tpub);

    let public_key = ColdcardExportPublicKey::new(Network::Testnet, "m/45'/0/0")
        .unwrap()
        .parse(coldcard_testnet_export_legacy())
        .unwrap();
    assert_eq!(public_key.public_key, MULTISIG_PUBKEY_1);

    // then it asks the Coldcard to sign a spend of the multisig
    let sign =
        ColdcardSignMultisigTransaction::new(Network::Testnet, &[], &[], Some(UNSIGNED_PSBT))
            .unwrap();
    let mut signatures = None;
    for step in sign.workflow() {
        match step {
            WorkflowStep::Request => {
                let psbt = sign.request().unwrap();
                assert!(parse_signatures_from_psbt(&psbt).unwrap().is_empty());
            }
            WorkflowStep::Parse => {
                // what the Coldcard writes back on the SD card
                let signed = add_signatures_to_psbt(
                    UNSIGNED_PSBT,
                    &[MULTISIG_PUBKEY_1.to_string()],
                    &[SIGNATURE.to_string()],
                )
                .unwrap();
                signatures = Some(sign.parse(json!(signed)).unwrap());
            }
        }
    }
    let signatures = signatures.unwrap();
    assert_eq!(signatures.get(&public_key.public_key).unwrap(), [SIGNATURE]);
    assert!(sign.has_messages_for(
        &MessageFilter::new()
            .state(State::Pending)
            .code("download_psbt")
    ));
}
