//! The sale's phase state machine.

use crate::errors::{Error, Result};

/// Sale phases, in the only order they can be entered.
///
/// ```text
///   Seed ──advance──► General ──advance──► Open (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub enum Phase {
    /// Whitelisted contributors only; contributions accrue as pending credit.
    Seed,
    /// Anyone may contribute; contributions still accrue as pending credit.
    General,
    /// Contributions mint immediately and tokens become transferable.
    Open,
}

impl Phase {
    /// The phase entered by the next advance, or `PhaseExhausted` at Open.
    pub fn next(self) -> Result<Phase> {
        match self {
            Phase::Seed => Ok(Phase::General),
            Phase::General => Ok(Phase::Open),
            Phase::Open => Err(Error::PhaseExhausted),
        }
    }

    /// Whether contributions in this phase are deferred as pending credit.
    pub fn defers_issuance(self) -> bool {
        self != Phase::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_strictly_forward() {
        assert_eq!(Phase::Seed.next(), Ok(Phase::General));
        assert_eq!(Phase::General.next(), Ok(Phase::Open));
        assert!(Phase::Seed < Phase::General && Phase::General < Phase::Open);
    }

    #[test]
    fn open_is_terminal() {
        assert_eq!(Phase::Open.next(), Err(Error::PhaseExhausted));
    }

    #[test]
    fn only_open_issues_immediately() {
        assert!(Phase::Seed.defers_issuance());
        assert!(Phase::General.defers_issuance());
        assert!(!Phase::Open.defers_issuance());
    }
}
