#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]

mod bc32;
pub mod bcur;
mod descriptor;
pub mod error;
mod export;
mod sign;

use mwk_common::{Level, Message, State};

pub use bcur::{decode_ur, encode_ur, Progress, UrDecoder, UrEncoder, UrError};
pub use descriptor::parse_descriptor_hex;
pub use error::Error;
pub use export::HermitExportExtendedPublicKey;
pub use sign::HermitSignMultisigTransaction;

pub type Result<T> = std::result::Result<T, error::Error>;

/// Messages of every Hermit interaction: scan the answer, after running `command`
pub(crate) fn hermit_messages(instructions: &str, command: &str) -> Vec<Message> {
    vec![
        Message::new(
            State::Active,
            Level::Info,
            "hermit.scanning",
            "Scan Hermit QR code sequence now.",
        ),
        Message::new(
            State::Pending,
            Level::Info,
            "hermit.command",
            format!("{instructions} '{command}'"),
        )
        .with_extra("mode", "wallet")
        .with_extra("instructions", instructions)
        .with_extra("command", command),
    ]
}
