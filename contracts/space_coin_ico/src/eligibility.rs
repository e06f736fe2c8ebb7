//! Contribution admission rules.
//!
//! The enforcer works on a snapshot of the ledger so it can be evaluated
//! before anything is written. A contribution is admitted or rejected as a
//! whole; caps are compared against the post-contribution cumulative.

use crate::config::SaleConfig;
use crate::errors::Error;
use crate::phase::Phase;
use crate::Balance;

/// Which limit a rejected contribution ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapBreach {
    /// The contributor's own cumulative cap.
    Individual,
    /// The phase-wide cumulative cap (or the goal, in Open).
    Aggregate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    ZeroAmount,
    NotWhitelisted,
    CapExceeded { phase: Phase, breach: CapBreach },
}

impl From<Rejection> for Error {
    fn from(rejection: Rejection) -> Self {
        match rejection {
            Rejection::ZeroAmount => Error::InvalidAmount,
            Rejection::NotWhitelisted => Error::NotWhitelisted,
            // Individual and aggregate breaches share one error kind.
            Rejection::CapExceeded { phase: Phase::Seed, .. } => Error::SeedCapReached,
            Rejection::CapExceeded { phase: Phase::General, .. } => Error::GeneralCapReached,
            Rejection::CapExceeded { phase: Phase::Open, .. } => Error::GoalReached,
        }
    }
}

/// Ledger snapshot relevant to a single contribution.
#[derive(Debug, Clone, Copy)]
pub struct Eligibility<'a> {
    pub config: &'a SaleConfig,
    pub phase: Phase,
    pub whitelisted: bool,
    /// Value the contributor has put in so far, across all phases.
    pub contributed: Balance,
    pub total_contributed: Balance,
}

impl Eligibility<'_> {
    pub fn check(&self, amount: Balance) -> Result<(), Rejection> {
        if amount == 0 {
            return Err(Rejection::ZeroAmount);
        }

        let individual = self.contributed.saturating_add(amount);
        let aggregate = self.total_contributed.saturating_add(amount);

        let (individual_cap, aggregate_cap) = match self.phase {
            Phase::Seed => {
                if !self.whitelisted {
                    return Err(Rejection::NotWhitelisted);
                }
                (Some(self.config.seed_individual_cap), self.config.seed_phase_cap)
            }
            Phase::General => (
                Some(self.config.general_individual_cap),
                self.config.general_phase_cap,
            ),
            Phase::Open => (None, self.config.goal),
        };

        if individual_cap.is_some_and(|cap| individual > cap) {
            return Err(Rejection::CapExceeded {
                phase: self.phase,
                breach: CapBreach::Individual,
            });
        }
        if aggregate > aggregate_cap {
            return Err(Rejection::CapExceeded {
                phase: self.phase,
                breach: CapBreach::Aggregate,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::space_coin;

    fn snapshot(config: &SaleConfig, phase: Phase, contributed: Balance, total: Balance) -> Eligibility<'_> {
        Eligibility {
            config,
            phase,
            whitelisted: true,
            contributed,
            total_contributed: total,
        }
    }

    #[test]
    fn zero_is_rejected_in_every_phase() {
        let config = space_coin();
        for phase in [Phase::Seed, Phase::General, Phase::Open] {
            let check = snapshot(&config, phase, 0, 0).check(0);
            assert_eq!(check, Err(Rejection::ZeroAmount));
            assert_eq!(Error::from(Rejection::ZeroAmount), Error::InvalidAmount);
        }
    }

    #[test]
    fn seed_requires_whitelist() {
        let config = space_coin();
        let mut check = snapshot(&config, Phase::Seed, 0, 0);
        check.whitelisted = false;
        assert_eq!(check.check(1), Err(Rejection::NotWhitelisted));

        check.phase = Phase::General;
        assert_eq!(check.check(1), Ok(()));
    }

    #[test]
    fn seed_individual_cap_is_inclusive() {
        let config = space_coin();
        let cap = config.seed_individual_cap;
        assert_eq!(snapshot(&config, Phase::Seed, 0, 0).check(cap), Ok(()));
        assert_eq!(
            snapshot(&config, Phase::Seed, cap, cap).check(1),
            Err(Rejection::CapExceeded { phase: Phase::Seed, breach: CapBreach::Individual })
        );
    }

    #[test]
    fn seed_aggregate_breach_maps_to_same_error() {
        let config = space_coin();
        let rejection = snapshot(&config, Phase::Seed, 0, config.seed_phase_cap).check(1).unwrap_err();
        assert_eq!(
            rejection,
            Rejection::CapExceeded { phase: Phase::Seed, breach: CapBreach::Aggregate }
        );
        assert_eq!(Error::from(rejection), Error::SeedCapReached);
    }

    #[test]
    fn general_cap_counts_seed_contributions() {
        let config = space_coin();
        // A full Seed allotment already exceeds the General individual cap.
        let seeded = config.seed_individual_cap;
        let rejection = snapshot(&config, Phase::General, seeded, seeded).check(1).unwrap_err();
        assert_eq!(Error::from(rejection), Error::GeneralCapReached);
    }

    #[test]
    fn general_aggregate_cap() {
        let config = space_coin();
        let check = snapshot(&config, Phase::General, 0, config.general_phase_cap - 10);
        assert_eq!(check.check(10), Ok(()));
        assert_eq!(
            check.check(11),
            Err(Rejection::CapExceeded { phase: Phase::General, breach: CapBreach::Aggregate })
        );
    }

    #[test]
    fn open_ignores_individual_caps_but_not_goal() {
        let config = space_coin();
        let check = snapshot(&config, Phase::Open, config.seed_individual_cap, config.seed_individual_cap);
        assert_eq!(check.check(config.seed_individual_cap), Ok(()));

        let full = snapshot(&config, Phase::Open, 0, config.goal);
        let rejection = full.check(1).unwrap_err();
        assert_eq!(Error::from(rejection), Error::GoalReached);
    }

    #[test]
    fn huge_amounts_saturate_instead_of_wrapping() {
        let config = space_coin();
        let check = snapshot(&config, Phase::Open, 1, 1);
        assert!(check.check(Balance::MAX).is_err());
    }
}
