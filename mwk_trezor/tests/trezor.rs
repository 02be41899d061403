use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use mwk_common::{DirectKeystoreInteraction, KeyDetails, Network, SignedTransaction};
use mwk_test_util::*;
use mwk_trezor::{
    initialize_once, ConnectConfig, ConnectResponse, Error, TrezorConnect, TrezorConnection,
    TrezorExportPublicKey, TrezorGetMetadata, TrezorInteraction, TrezorMethod,
    TrezorSignMultisigTransaction,
};
use serde_json::{json, Value};

/// Answers every call with the response registered for its method, recording the calls
#[derive(Default)]
struct MockBridge {
    responses: Vec<(TrezorMethod, ConnectResponse)>,
    calls: Mutex<Vec<(TrezorMethod, Value)>>,
    fail_init: bool,
}

impl MockBridge {
    fn with(mut self, method: TrezorMethod, response: ConnectResponse) -> Self {
        self.responses.push((method, response));
        self
    }

    fn methods(&self) -> Vec<TrezorMethod> {
        let calls = self.calls.lock().unwrap();
        calls.iter().map(|(m, _)| *m).collect()
    }
}

#[async_trait]
impl TrezorConnect for MockBridge {
    async fn init(&self, _config: &ConnectConfig) -> Result<(), Error> {
        if self.fail_init {
            return Err(Error::Connect("popup blocked".to_string()));
        }
        Ok(())
    }

    async fn call(&self, method: TrezorMethod, params: Value) -> Result<ConnectResponse, Error> {
        self.calls.lock().unwrap().push((method, params));
        Ok(self
            .responses
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, r)| r.clone())
            .unwrap_or_else(|| ConnectResponse::failure("unexpected method")))
    }
}

fn sign_interaction() -> TrezorSignMultisigTransaction {
    let key_details = KeyDetails {
        xfp: ROOT_FINGERPRINT.to_string(),
        path: "m/45'".to_string(),
    };
    TrezorSignMultisigTransaction::from_psbt(Network::Testnet, UNSIGNED_PSBT, &key_details, false)
        .unwrap()
}

#[tokio::test]
async fn sign_with_failing_bridge() {
    init_logging();
    let bridge = Arc::new(MockBridge::default().with(
        TrezorMethod::SignTransaction,
        ConnectResponse::failure("foobar"),
    ));
    let connection = TrezorConnection::new(bridge.clone(), ConnectConfig::default())
        .await
        .unwrap();
    let err = sign_interaction().run_with(&connection).await.unwrap_err();
    assert!(err.to_string().contains("foobar"));
    assert_eq!(bridge.methods(), [TrezorMethod::SignTransaction]);
}

#[tokio::test]
async fn sign_in_dev_mode() {
    init_logging();
    let bridge = Arc::new(
        MockBridge::default()
            .with(
                TrezorMethod::BlockchainSetCustomBackend,
                ConnectResponse::ok(json!({"message": "ok"})),
            )
            .with(
                TrezorMethod::SignTransaction,
                ConnectResponse::ok(json!({"signatures": [SIGNATURE_NO_SIGHASH]})),
            ),
    );
    let config = ConnectConfig {
        dev: true,
        ..Default::default()
    };
    let connection = TrezorConnection::new(bridge.clone(), config).await.unwrap();
    let signed = sign_interaction().run_with(&connection).await.unwrap();
    assert!(matches!(signed, SignedTransaction::Psbt(_)));
    assert_eq!(
        bridge.methods(),
        [
            TrezorMethod::BlockchainSetCustomBackend,
            TrezorMethod::SignTransaction
        ]
    );
    let calls = bridge.calls.lock().unwrap();
    assert_eq!(calls[0].1["blockchainLink"]["url"][0], "http://localhost:3035");
}

#[tokio::test]
async fn init_failure() {
    let bridge = Arc::new(MockBridge {
        fail_init: true,
        ..Default::default()
    });
    let err = TrezorConnection::new(bridge, ConnectConfig::default())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to initialize Trezor Connect: popup blocked"
    );
}

#[tokio::test]
async fn global_connection() {
    init_logging();
    let features = json!({
        "major_version": 2,
        "minor_version": 6,
        "patch_version": 3,
        "model": "T",
        "label": "My Trezor",
        "pin_protection": true,
        "passphrase_protection": false,
    });
    let first = Arc::new(
        MockBridge::default()
            .with(TrezorMethod::GetFeatures, ConnectResponse::ok(features))
            .with(
                TrezorMethod::GetPublicKey,
                ConnectResponse::ok(json!({"publicKey": MULTISIG_PUBKEY_1})),
            ),
    );
    let connection = initialize_once(first.clone(), ConnectConfig::default())
        .await
        .unwrap();
    let again = initialize_once(Arc::new(MockBridge::default()), ConnectConfig::default())
        .await
        .unwrap();
    assert!(std::ptr::eq(connection, again));

    let metadata = TrezorGetMetadata::new().run().await.unwrap();
    assert_eq!(metadata.spec, "Model T v.2.6.3 w/PIN");
    assert_eq!(metadata.label.as_deref(), Some("My Trezor"));

    let export = TrezorExportPublicKey::new(Network::Testnet, MULTISIG_SIGNING_PATH, false)
        .run()
        .await
        .unwrap();
    assert_eq!(export.public_key, MULTISIG_PUBKEY_1);
    assert_eq!(
        first.methods(),
        [TrezorMethod::GetFeatures, TrezorMethod::GetPublicKey]
    );
}
