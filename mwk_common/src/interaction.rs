use async_trait::async_trait;
use serde_json::Value;

use crate::message::{Level, Message, MessageFilter, State};
use crate::Error;

/// A step the caller of an indirect interaction has to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    /// Call `request()` and transmit its result to the keystore
    Request,

    /// Call `parse()` with what the keystore returned
    Parse,
}

/// Workflow of interactions that only consume data coming from the keystore
pub const PARSE_ONLY: &[WorkflowStep] = &[WorkflowStep::Parse];

/// Workflow of interactions that send data to the keystore and read its answer
pub const REQUEST_THEN_PARSE: &[WorkflowStep] = &[WorkflowStep::Request, WorkflowStep::Parse];

/// Capabilities shared by every interaction with a keystore.
///
/// An interaction only holds the parameters it was built with, messages are computed
/// freshly at every call and their order is significant: callers show the first match.
pub trait KeystoreInteraction {
    fn is_supported(&self) -> bool {
        true
    }

    fn messages(&self) -> Vec<Message> {
        vec![]
    }

    fn messages_for(&self, filter: &MessageFilter) -> Vec<Message> {
        self.messages()
            .into_iter()
            .filter(|m| filter.matches(m))
            .collect()
    }

    fn has_messages_for(&self, filter: &MessageFilter) -> bool {
        !self.messages_for(filter).is_empty()
    }

    fn message_for(&self, filter: &MessageFilter) -> Option<Message> {
        self.messages_for(filter).into_iter().next()
    }

    fn message_text_for(&self, filter: &MessageFilter) -> Option<String> {
        self.message_for(filter).map(|m| m.text)
    }
}

/// An interaction with a connected device, performed end to end by [`Self::run`]
#[async_trait]
pub trait DirectKeystoreInteraction: KeystoreInteraction + Sync {
    type Output: Send;
    type Error: From<Error> + Send;

    async fn run(&self) -> Result<Self::Output, Self::Error>;

    fn request(&self) -> Result<Value, Self::Error> {
        Err(Error::DirectInteraction("request").into())
    }

    fn parse(&self, _response: Value) -> Result<Self::Output, Self::Error> {
        Err(Error::DirectInteraction("parse").into())
    }
}

/// An interaction exchanged through an external channel such as a file or a QR code.
///
/// The caller follows [`Self::workflow`]: it calls [`Self::request`] when required, moves
/// the data to the keystore, then hands the answer to [`Self::parse`].
#[async_trait]
pub trait IndirectKeystoreInteraction: KeystoreInteraction + Sync {
    type Request;
    type Output: Send;
    type Error: From<Error> + Send;

    fn workflow(&self) -> &'static [WorkflowStep] {
        PARSE_ONLY
    }

    fn request(&self) -> Result<Self::Request, Self::Error> {
        Err(Error::NotOverridden("request").into())
    }

    fn parse(&self, response: Value) -> Result<Self::Output, Self::Error>;

    async fn run(&self) -> Result<Self::Output, Self::Error> {
        Err(Error::IndirectInteraction.into())
    }
}

/// Returned by the factories when a keystore does not support an operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedInteraction {
    code: String,
    text: String,
}

impl UnsupportedInteraction {
    pub fn new(code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            text: text.into(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub async fn run<T>(&self) -> Result<T, Error> {
        Err(self.error())
    }

    pub fn request<T>(&self) -> Result<T, Error> {
        Err(self.error())
    }

    pub fn parse<T>(&self, _response: Value) -> Result<T, Error> {
        Err(self.error())
    }

    fn error(&self) -> Error {
        Error::Unsupported(self.text.clone())
    }
}

impl KeystoreInteraction for UnsupportedInteraction {
    fn is_supported(&self) -> bool {
        false
    }

    fn messages(&self) -> Vec<Message> {
        vec![Message::new(
            State::Unsupported,
            Level::Error,
            &self.code,
            &self.text,
        )]
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Plug;

    impl KeystoreInteraction for Plug {
        fn messages(&self) -> Vec<Message> {
            vec![
                Message::new(State::Pending, Level::Info, "device.connect", "first"),
                Message::new(State::Pending, Level::Info, "device.connect", "second"),
            ]
        }
    }

    #[async_trait]
    impl DirectKeystoreInteraction for Plug {
        type Output = ();
        type Error = Error;

        async fn run(&self) -> Result<(), Error> {
            Ok(())
        }
    }

    struct Upload;

    impl KeystoreInteraction for Upload {}

    impl IndirectKeystoreInteraction for Upload {
        type Request = String;
        type Output = Value;
        type Error = Error;

        fn parse(&self, response: Value) -> Result<Value, Error> {
            Ok(response)
        }
    }

    #[test]
    fn test_first_match_wins() {
        let filter = MessageFilter::new().code("device.connect");
        assert!(Plug.has_messages_for(&filter));
        assert_eq!(Plug.message_text_for(&filter).unwrap(), "first");
        assert!(Plug.message_for(&MessageFilter::new().code("trezor")).is_none());
        assert!(Plug
            .message_text_for(&MessageFilter::new().state(State::Active))
            .is_none());
    }

    #[tokio::test]
    async fn test_direct_disallows_request_and_parse() {
        Plug.run().await.unwrap();
        let err = DirectKeystoreInteraction::request(&Plug).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This interaction is direct and does not support a `request` method."
        );
        let err = DirectKeystoreInteraction::parse(&Plug, Value::Null).unwrap_err();
        assert_eq!(
            err.to_string(),
            "This interaction is direct and does not support a `parse` method."
        );
    }

    #[tokio::test]
    async fn test_indirect_disallows_run() {
        assert_eq!(Upload.workflow(), PARSE_ONLY);
        let err = IndirectKeystoreInteraction::run(&Upload).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "This interaction is indirect and does not support a `run` method."
        );
        let err = IndirectKeystoreInteraction::request(&Upload).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Override the `request` method in this interaction."
        );
        let parsed = IndirectKeystoreInteraction::parse(&Upload, Value::Bool(true)).unwrap();
        assert_eq!(parsed, Value::Bool(true));
    }

    #[tokio::test]
    async fn test_unsupported() {
        let interaction = UnsupportedInteraction::new("x", "y");
        assert!(!interaction.is_supported());
        let messages = interaction.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].state, State::Unsupported);
        assert_eq!(messages[0].level, Level::Error);
        assert_eq!(messages[0].code, "x");
        assert_eq!(messages[0].text, "y");

        let err = interaction.run::<()>().await.unwrap_err();
        assert_eq!(err.to_string(), "y");
        let err = interaction.request::<String>().unwrap_err();
        assert_eq!(err.to_string(), "y");
        let err = interaction.parse::<String>(Value::Null).unwrap_err();
        assert_eq!(err.to_string(), "y");
    }
}
