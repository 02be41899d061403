use async_trait::async_trait;
use mwk_common::path::validate_bip32_path;
use mwk_common::{KeystoreInteraction, Level, Message, PathMode, State};
use serde_json::{json, Value};

use crate::connect::{TrezorConnection, TrezorMethod};
use crate::Error;

/// Pushing the left button of a Trezor One
pub const TREZOR_LEFT_BUTTON: &str = "trezor_left_button";

/// Pushing the right button of a Trezor One
pub const TREZOR_RIGHT_BUTTON: &str = "trezor_right_button";

/// Pushing both buttons of a Trezor One
pub const TREZOR_BOTH_BUTTONS: &str = "trezor_both_buttons";

/// Pushing and holding the confirm button of a Trezor Model T
pub const TREZOR_PUSH_AND_HOLD_BUTTON: &str = "trezor_push_and_hold_button";

/// A call to Trezor Connect: the method with its parameters and how to read the response.
///
/// [`crate::impl_direct_interaction`] turns an implementor into a
/// [`mwk_common::DirectKeystoreInteraction`] running against the process wide connection.
#[async_trait]
pub trait TrezorInteraction: KeystoreInteraction + Sync {
    type Output: Send;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error>;

    fn parse_payload(&self, payload: Value) -> Result<Self::Output, Error>;

    async fn run_with(&self, connection: &TrezorConnection) -> Result<Self::Output, Error> {
        let (method, params) = self.connect_params()?;
        if connection.config().dev && method == TrezorMethod::SignTransaction {
            connection.set_custom_backend().await?;
        }
        let payload = connection.call(method, params).await?;
        self.parse_payload(payload)
    }
}

#[macro_export]
macro_rules! impl_direct_interaction {
    ($type:ty) => {
        #[async_trait::async_trait]
        impl mwk_common::DirectKeystoreInteraction for $type {
            type Output = <$type as $crate::TrezorInteraction>::Output;
            type Error = $crate::Error;

            async fn run(&self) -> Result<Self::Output, Self::Error> {
                let connection = $crate::connection()?;
                $crate::TrezorInteraction::run_with(self, connection).await
            }
        }
    };
}

/// Messages shared by every Trezor interaction
pub(crate) fn trezor_messages() -> Vec<Message> {
    vec![
        Message::new(
            State::Pending,
            Level::Info,
            "device.connect",
            "Make sure your Trezor device is plugged in.",
        )
        .with_version("One"),
        Message::new(
            State::Pending,
            Level::Info,
            "device.connect",
            "Make sure your Trezor device is plugged in and unlocked.",
        )
        .with_version("T"),
        Message::new(
            State::Active,
            Level::Info,
            "trezor.connect.generic",
            "Your browser should now open a new window to Trezor Connect. Ensure you have enabled popups for this site.",
        ),
    ]
}

/// Errors of a BIP32 path given to the device, Trezor needs at least depth 3
pub(crate) fn bip32_path_messages(bip32_path: &str) -> Vec<Message> {
    let mut messages = vec![];
    if bip32_path.split('/').count() < 4 {
        messages.push(Message::new(
            State::Pending,
            Level::Error,
            "trezor.bip32_path.minimum",
            "BIP32 path must be at least depth 3.",
        ));
    }
    if let Err(e) = validate_bip32_path(bip32_path, PathMode::Any) {
        messages.push(Message::new(
            State::Pending,
            Level::Error,
            "trezor.bip32_path.path_error",
            e.to_string(),
        ));
    }
    messages
}

/// The buttons to push on the device, carried in the `messages` field of a message
pub(crate) fn device_steps(steps: &[(&str, &str)]) -> Value {
    steps
        .iter()
        .map(|(text, action)| json!({ "text": text, "action": action }))
        .collect()
}

#[cfg(test)]
mod test {
    use mwk_common::MessageFilter;

    use super::*;

    #[test]
    fn test_bip32_path_messages() {
        assert!(bip32_path_messages("m/45'/0'/0'").is_empty());
        let messages = bip32_path_messages("m/45'/0'");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "trezor.bip32_path.minimum");

        let messages = bip32_path_messages("m/45'/0'/x");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].code, "trezor.bip32_path.path_error");
        assert_eq!(messages[0].text, "BIP32 path is invalid.");

        assert_eq!(bip32_path_messages("").len(), 2);
    }

    #[test]
    fn test_trezor_messages() {
        struct Plain;
        impl KeystoreInteraction for Plain {
            fn messages(&self) -> Vec<Message> {
                trezor_messages()
            }
        }
        let filter = MessageFilter::new().code("device.connect").version("T");
        assert_eq!(
            Plain.message_text_for(&filter).unwrap(),
            "Make sure your Trezor device is plugged in and unlocked."
        );
        let steps = device_steps(&[("first", TREZOR_RIGHT_BUTTON)]);
        assert_eq!(
            steps,
            json!([{"text": "first", "action": "trezor_right_button"}])
        );
    }
}
