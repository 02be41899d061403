#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

pub mod error;
mod interaction;
pub mod keys;
mod message;
mod model;
pub mod multisig;
mod network;
pub mod path;
pub mod psbt;
mod qr;
pub mod signature;

pub use crate::error::Error;
pub use crate::interaction::{
    DirectKeystoreInteraction, IndirectKeystoreInteraction, KeystoreInteraction,
    UnsupportedInteraction, WorkflowStep, PARSE_ONLY, REQUEST_THEN_PARSE,
};
pub use crate::message::{Level, Message, MessageFilter, State};
pub use crate::model::*;
pub use crate::multisig::{
    AddressType, Bip32Derivation, KeyDetails, Multisig, MultisigInput, MultisigOutput,
};
pub use crate::network::Network;
pub use crate::path::{PathError, PathMode};
pub use crate::qr::*;

pub type Result<T> = std::result::Result<T, error::Error>;

#[cfg(test)]
mod test {
    use super::*;

    fn network(name: &str) -> Result<Network> {
        Ok(name.parse()?)
    }

    #[test]
    fn test_result() {
        assert_eq!(network("testnet").unwrap(), Network::Testnet);
        assert!(matches!(
            network("litecoin"),
            Err(Error::UnknownNetwork)
        ));
    }
}
