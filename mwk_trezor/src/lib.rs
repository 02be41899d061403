#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod address;
mod config;
mod connect;
pub mod error;
mod export;
mod interaction;
mod metadata;
pub mod params;
mod sign;
mod sign_message;

pub use address::TrezorConfirmMultisigAddress;
pub use config::{
    ConnectConfig, Manifest, TrezorCoin, DEV_BLOCKBOOK_URL, DEV_CONNECT_SRC, TREZOR_CONNECT_SRC,
};
pub use connect::{
    connection, initialize_once, ConnectResponse, TrezorConnect, TrezorConnection, TrezorMethod,
};
pub use error::Error;
pub use export::{TrezorExportExtendedPublicKey, TrezorExportHDNode, TrezorExportPublicKey};
pub use interaction::{
    TrezorInteraction, TREZOR_BOTH_BUTTONS, TREZOR_LEFT_BUTTON, TREZOR_PUSH_AND_HOLD_BUTTON,
    TREZOR_RIGHT_BUTTON,
};
pub use metadata::TrezorGetMetadata;
pub use sign::TrezorSignMultisigTransaction;
pub use sign_message::{SignedMessage, TrezorSignMessage};

pub type Result<T> = std::result::Result<T, error::Error>;
