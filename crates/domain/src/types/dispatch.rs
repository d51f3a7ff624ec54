//! Dispatch channels tracked by the ledger

use serde::{Deserialize, Serialize};

use crate::impl_domain_str_conversions;

/// A notification channel whose sends are recorded per union
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchChannel {
    /// Regular status mail; every send is appended to a history.
    Status,
    /// The final status mail; recorded once.
    FinalStatus,
    /// The invoice mail; recorded once.
    Invoice,
}

impl_domain_str_conversions!(DispatchChannel {
    Status => "status",
    FinalStatus => "final_status",
    Invoice => "invoice",
});

impl DispatchChannel {
    pub const ALL: [Self; 3] = [Self::Status, Self::FinalStatus, Self::Invoice];

    /// Whether a recorded send suppresses any further send on this channel.
    pub const fn is_once_only(&self) -> bool {
        matches!(self, Self::FinalStatus | Self::Invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_and_display_names_match() {
        for channel in DispatchChannel::ALL {
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(json, format!("\"{channel}\""));
            assert_eq!(channel.as_str().parse::<DispatchChannel>().unwrap(), channel);
        }
    }

    #[test]
    fn only_regular_status_repeats() {
        assert!(!DispatchChannel::Status.is_once_only());
        assert!(DispatchChannel::FinalStatus.is_once_only());
        assert!(DispatchChannel::Invoice.is_once_only());
    }
}
