use mwk_common::{DeviceMetadata, DeviceVersion, KeystoreInteraction, Message};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::connect::TrezorMethod;
use crate::interaction::{trezor_messages, TrezorInteraction};
use crate::{impl_direct_interaction, Error};

/// Subset of the device features returned by `getFeatures`
#[derive(Debug, Deserialize)]
struct Features {
    major_version: u32,
    minor_version: u32,
    patch_version: u32,
    model: String,
    label: Option<String>,
    pin_protection: Option<bool>,
    passphrase_protection: Option<bool>,
}

/// Model, label, firmware version and PIN/passphrase protection of the device
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrezorGetMetadata;

impl TrezorGetMetadata {
    pub fn new() -> Self {
        Self
    }
}

impl KeystoreInteraction for TrezorGetMetadata {
    fn messages(&self) -> Vec<Message> {
        trezor_messages()
    }
}

impl TrezorInteraction for TrezorGetMetadata {
    type Output = DeviceMetadata;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        Ok((TrezorMethod::GetFeatures, json!({})))
    }

    fn parse_payload(&self, payload: Value) -> Result<DeviceMetadata, Error> {
        let features: Features = serde_json::from_value(payload)?;
        let pin = features.pin_protection.unwrap_or(false);
        let passphrase = features.passphrase_protection.unwrap_or(false);
        let version = format!(
            "{}.{}.{}",
            features.major_version, features.minor_version, features.patch_version
        );
        let mut spec = format!("Model {} v.{version}", features.model);
        if pin {
            spec.push_str(" w/PIN");
        }
        if passphrase {
            spec.push_str(" w/PASS");
        }
        Ok(DeviceMetadata {
            spec,
            model: format!("Model {}", features.model),
            version: DeviceVersion {
                major: features.major_version,
                minor: features.minor_version,
                patch: features.patch_version,
                string: version,
            },
            label: features.label,
            pin,
            passphrase,
        })
    }
}

impl_direct_interaction!(TrezorGetMetadata);

#[cfg(test)]
mod test {
    use super::*;

    fn features() -> Value {
        json!({
            "bootloader_hash": "5112...846e9",
            "device_id": "BDF9...F198",
            "initialized": true,
            "label": "My Trezor",
            "major_version": 1,
            "minor_version": 8,
            "model": "1",
            "passphrase_protection": false,
            "patch_version": 3,
            "pin_protection": true,
            "vendor": "bitcointrezor.com",
        })
    }

    #[test]
    fn test_parse_features() {
        let interaction = TrezorGetMetadata::new();
        assert_eq!(
            interaction.connect_params().unwrap(),
            (TrezorMethod::GetFeatures, json!({}))
        );

        let metadata = interaction.parse_payload(features()).unwrap();
        assert_eq!(metadata.spec, "Model 1 v.1.8.3 w/PIN");
        assert_eq!(metadata.model, "Model 1");
        assert_eq!(metadata.version.string, "1.8.3");
        assert_eq!(metadata.label.as_deref(), Some("My Trezor"));
        assert!(metadata.pin);
        assert!(!metadata.passphrase);

        let mut features = features();
        features["model"] = json!("T");
        features["pin_protection"] = json!(false);
        features["passphrase_protection"] = json!(true);
        features["label"] = Value::Null;
        let metadata = interaction.parse_payload(features).unwrap();
        assert_eq!(metadata.spec, "Model T v.1.8.3 w/PASS");
        assert!(metadata.label.is_none());

        assert!(interaction.parse_payload(json!({"model": "1"})).is_err());
    }
}
