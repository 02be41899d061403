use mwk_common::{DirectKeystoreInteraction, IndirectKeystoreInteraction, UnsupportedInteraction};
use serde::Serialize;
use serde_json::Value;

use crate::Error;

/// How the caller drives an interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    /// Performed end to end by `run()`
    Direct,

    /// Performed by the caller following `workflow()`
    Indirect,

    /// Every method fails with the reason the keystore is not supported
    Unsupported,
}

pub(crate) fn unsupported(text: &str) -> UnsupportedInteraction {
    UnsupportedInteraction::new("unsupported", text)
}

pub(crate) async fn run_direct<I>(interaction: &I) -> Result<I::Output, Error>
where
    I: DirectKeystoreInteraction,
    Error: From<I::Error>,
{
    Ok(interaction.run().await?)
}

pub(crate) fn request_direct<I>(interaction: &I) -> Result<Value, Error>
where
    I: DirectKeystoreInteraction,
    Error: From<I::Error>,
{
    Ok(DirectKeystoreInteraction::request(interaction)?)
}

pub(crate) fn parse_direct<I>(interaction: &I, response: Value) -> Result<I::Output, Error>
where
    I: DirectKeystoreInteraction,
    Error: From<I::Error>,
{
    Ok(DirectKeystoreInteraction::parse(interaction, response)?)
}

pub(crate) async fn run_indirect<I>(interaction: &I) -> Result<I::Output, Error>
where
    I: IndirectKeystoreInteraction,
    Error: From<I::Error>,
{
    Ok(IndirectKeystoreInteraction::run(interaction).await?)
}

/// The request of an indirect interaction as JSON, whatever its type
pub(crate) fn request_indirect<I>(interaction: &I) -> Result<Value, Error>
where
    I: IndirectKeystoreInteraction,
    I::Request: Serialize,
    Error: From<I::Error>,
{
    let request = IndirectKeystoreInteraction::request(interaction)?;
    Ok(serde_json::to_value(request)?)
}

pub(crate) fn parse_indirect<I>(interaction: &I, response: Value) -> Result<I::Output, Error>
where
    I: IndirectKeystoreInteraction,
    Error: From<I::Error>,
{
    Ok(IndirectKeystoreInteraction::parse(interaction, response)?)
}
