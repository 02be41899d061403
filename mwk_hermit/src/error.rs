use crate::bcur::UrError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Common(#[from] mwk_common::Error),

    #[error(transparent)]
    Ur(#[from] UrError),

    #[error("No descriptor received from Hermit.")]
    NoDescriptor,

    #[error("Invalid descriptor received from Hermit.")]
    InvalidDescriptor,

    #[error("PSBT is required.")]
    PsbtRequired,

    #[error("No signature received from Hermit.")]
    NoSignature,
}
