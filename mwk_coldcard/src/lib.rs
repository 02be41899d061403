#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

pub mod chroot;
mod config;
pub mod error;
mod export;
mod file;
mod sign;

pub use chroot::{validate_coldcard_bip32_path, ColdcardPathError, COLDCARD_CHROOTS};
pub use config::{ColdcardMultisigWalletConfig, ConfigExtendedPublicKey};
pub use error::Error;
pub use export::{ColdcardExportExtendedPublicKey, ColdcardExportPublicKey};
pub use file::ColdcardXpubFile;
pub use sign::ColdcardSignMultisigTransaction;

pub type Result<T> = std::result::Result<T, error::Error>;
