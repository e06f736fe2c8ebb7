//! Sale parameters and the rate and tax arithmetic derived from them.

use crate::errors::{Error, Result};
use crate::Balance;

/// Sale parameters, fixed at construction.
///
/// Caps and the goal are in native value units; `max_supply` and
/// `treasury_reserve` are in token units. `token_rate` converts the former
/// into the latter.
#[derive(Debug, Clone, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(
    feature = "std",
    derive(scale_info::TypeInfo, ink::storage::traits::StorageLayout)
)]
pub struct SaleConfig {
    pub seed_individual_cap: Balance,
    pub seed_phase_cap: Balance,
    pub general_individual_cap: Balance,
    pub general_phase_cap: Balance,
    pub goal: Balance,
    pub max_supply: Balance,
    /// Tokens issued per unit of contributed value.
    pub token_rate: Balance,
    pub tax_numerator: Balance,
    pub tax_denominator: Balance,
    /// Tokens credited to the treasury at construction.
    pub treasury_reserve: Balance,
    /// Advance the phase as soon as a contribution exhausts its phase cap.
    pub auto_advance: bool,
    /// Apply the transfer tax to freshly issued tokens as well.
    pub tax_on_issuance: bool,
}

impl SaleConfig {
    pub fn validate(&self) -> Result<()> {
        if self.token_rate == 0 || self.tax_denominator == 0 {
            return Err(Error::InvalidConfig);
        }
        if self.tax_numerator > self.tax_denominator {
            return Err(Error::InvalidConfig);
        }
        // Bounds the remainder term in `split_tax`.
        if self.tax_denominator.checked_mul(self.tax_numerator).is_none() {
            return Err(Error::InvalidConfig);
        }

        let caps = [
            self.seed_individual_cap,
            self.seed_phase_cap,
            self.general_individual_cap,
            self.general_phase_cap,
            self.goal,
        ];
        if caps.iter().any(|cap| *cap == 0) {
            return Err(Error::InvalidConfig);
        }
        if self.seed_phase_cap > self.general_phase_cap || self.general_phase_cap > self.goal {
            return Err(Error::InvalidConfig);
        }

        // Selling the whole goal must fit next to the treasury reserve.
        let sale_tokens = self.tokens_for(self.goal).map_err(|_| Error::InvalidConfig)?;
        let issuable = sale_tokens
            .checked_add(self.treasury_reserve)
            .ok_or(Error::InvalidConfig)?;
        if issuable > self.max_supply {
            return Err(Error::InvalidConfig);
        }
        Ok(())
    }

    /// Tokens issued for `value` contributed units.
    pub fn tokens_for(&self, value: Balance) -> Result<Balance> {
        value.checked_mul(self.token_rate).ok_or(Error::Overflow)
    }

    /// Splits `amount` into `(net, tax)`. Tax truncates toward zero.
    ///
    /// Computed as `amount / den * num + (amount % den) * num / den`, which
    /// equals `amount * num / den` without forming the full product.
    pub fn split_tax(&self, amount: Balance) -> Result<(Balance, Balance)> {
        let (num, den) = (self.tax_numerator, self.tax_denominator);
        let whole = (amount / den) * num;
        let part = (amount % den).checked_mul(num).ok_or(Error::Overflow)? / den;
        let tax = whole + part;
        Ok((amount - tax, tax))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const UNIT: Balance = 1_000_000_000_000_000_000;

    /// The parameter set the SpaceCoin sale launched with.
    pub(crate) fn space_coin() -> SaleConfig {
        SaleConfig {
            seed_individual_cap: 1_500 * UNIT,
            seed_phase_cap: 15_000 * UNIT,
            general_individual_cap: 1_000 * UNIT,
            general_phase_cap: 30_000 * UNIT,
            goal: 30_000 * UNIT,
            max_supply: 500_000 * UNIT,
            token_rate: 5,
            tax_numerator: 2,
            tax_denominator: 100,
            treasury_reserve: 350_000 * UNIT,
            auto_advance: false,
            tax_on_issuance: false,
        }
    }

    #[test]
    fn space_coin_parameters_are_consistent() {
        assert_eq!(space_coin().validate(), Ok(()));
    }

    #[test]
    fn rejects_zero_rate_and_bad_tax() {
        let mut config = space_coin();
        config.token_rate = 0;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));

        let mut config = space_coin();
        config.tax_denominator = 0;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));

        let mut config = space_coin();
        config.tax_numerator = 101;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn rejects_unordered_phase_caps() {
        let mut config = space_coin();
        config.seed_phase_cap = config.general_phase_cap + 1;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));

        let mut config = space_coin();
        config.general_phase_cap = config.goal + 1;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn rejects_zero_caps() {
        let mut config = space_coin();
        config.general_individual_cap = 0;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn rejects_reserve_crowding_out_the_sale() {
        let mut config = space_coin();
        config.treasury_reserve += 1;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }

    #[test]
    fn individual_caps_need_not_be_ordered() {
        // SpaceCoin allows 1500 in Seed but only 1000 cumulative in General.
        let config = space_coin();
        assert!(config.general_individual_cap < config.seed_individual_cap);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn tax_truncates_in_favour_of_recipient() {
        let config = space_coin();
        assert_eq!(config.split_tax(100), Ok((98, 2)));
        assert_eq!(config.split_tax(49), Ok((49, 0)));
        assert_eq!(config.split_tax(51), Ok((50, 1)));
        assert_eq!(config.split_tax(0), Ok((0, 0)));
    }

    #[test]
    fn tax_on_the_largest_balance_does_not_overflow() {
        let config = space_coin();
        let tax = Balance::MAX / 50;
        assert_eq!(config.split_tax(Balance::MAX), Ok((Balance::MAX - tax, tax)));
    }

    #[test]
    fn fine_grained_tax_rate_splits_huge_amounts() {
        let mut config = space_coin();
        config.tax_numerator = 2_000_000_000;
        config.tax_denominator = 100_000_000_000;
        config.max_supply = Balance::MAX / 1_000_000;
        assert_eq!(config.validate(), Ok(()));

        let amount = config.max_supply;
        assert_eq!(config.split_tax(amount), Ok((amount - amount / 50, amount / 50)));
    }

    #[test]
    fn rejects_tax_ratio_too_wide_to_split() {
        let mut config = space_coin();
        config.tax_numerator = 1 << 64;
        config.tax_denominator = 1 << 65;
        assert_eq!(config.validate(), Err(Error::InvalidConfig));
    }
}
