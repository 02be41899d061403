#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod config;
mod device;
pub mod error;
mod export;
mod interaction;
mod keystore;
mod sign;

pub use config::{register_wallet_policy, ConfigAdapter};
pub use device::{ConfirmMultisigAddress, GetMetadata, SignMessage};
pub use error::Error;
pub use export::{ExportExtendedPublicKey, ExportPublicKey};
pub use interaction::InteractionKind;
pub use keystore::Keystore;
pub use sign::{SignMultisigTransaction, SignParams};

pub type Result<T> = std::result::Result<T, error::Error>;
