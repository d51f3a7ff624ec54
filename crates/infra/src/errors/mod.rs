//! Infrastructure error handling

mod conversions;

pub use conversions::InfraError;
use ticketmail_domain::TicketMailError;

/// Map any adapter error with an [`InfraError`] conversion into the domain
/// error, for use with `map_err`.
pub(crate) fn to_domain<E: Into<InfraError>>(err: E) -> TicketMailError {
    err.into().0
}
