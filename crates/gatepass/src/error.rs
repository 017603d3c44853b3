use gatepass_core::{GatepassError, TicketId};
use gatepass_cred::CredErrorDetail;
use gatepass_session::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("credential engine: {0}")]
    Cred(#[from] CredErrorDetail),

    #[error(transparent)]
    Storage(#[from] GatepassError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no credential stored for ticket {0}")]
    NoCredential(TicketId),
}

pub type WalletResult<T> = Result<T, WalletError>;
