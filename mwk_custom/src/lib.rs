#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

pub mod error;
mod export;
mod sign;

pub use error::Error;
pub use export::CustomExportExtendedPublicKey;
pub use sign::CustomSignMultisigTransaction;

pub type Result<T> = std::result::Result<T, error::Error>;
