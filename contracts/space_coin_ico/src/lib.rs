#![cfg_attr(not(feature = "std"), no_std, no_main)]

pub mod config;
pub mod eligibility;
pub mod errors;
pub mod phase;

pub type Balance = u128;

pub use self::space_coin_ico::{SpaceCoinIco, SpaceCoinIcoRef};

/// # SpaceCoin ICO
///
/// **Role:** Phased fundraising ledger. Accepts native value from
/// contributors, converts it into SpaceCoin under a fixed supply schedule,
/// and holds the raised value until the owner withdraws it.
///
/// **Flow:**
/// ```text
///   contribute ─► [pause gate] ─► [eligibility & caps] ─┬─ Seed/General ─► pending credit
///                                                        └─ Open ─► release pending + mint
///   claim ──────► [Open only] ─► release pending
///   transfer ───► [Open only] ─► debit sender, credit recipient (net) + treasury (tax)
/// ```
///
/// Pending credits are held in value units and converted at `token_rate`
/// when released. Release is lazy: advancing the phase never walks the
/// contributor set.
#[ink::contract]
mod space_coin_ico {
    use crate::config::SaleConfig;
    use crate::eligibility::Eligibility;
    use crate::errors::{Error, Result};
    use crate::phase::Phase;
    use ink::prelude::vec::Vec;
    use ink::storage::Mapping;

    // =========================================================================
    // STORAGE
    // =========================================================================

    #[ink(storage)]
    pub struct SpaceCoinIco {
        owner: AccountId,
        treasury: AccountId,
        config: SaleConfig,

        // ── Phase controller ──────────────────────────────────────────────
        phase: Phase,
        paused: bool,
        tax_enabled: bool,

        // ── Eligibility ───────────────────────────────────────────────────
        /// Seed-phase contributors, fixed at construction.
        whitelist: Mapping<AccountId, bool>,
        whitelist_len: u32,
        /// Cumulative value contributed per identity, across all phases.
        contributed: Mapping<AccountId, Balance>,
        total_contributed: Balance,

        // ── Pending credits ───────────────────────────────────────────────
        /// Value contributed in Seed/General, not yet converted to tokens.
        pending_credits: Mapping<AccountId, Balance>,

        // ── Token ledger ──────────────────────────────────────────────────
        balances: Mapping<AccountId, Balance>,
        allowances: Mapping<(AccountId, AccountId), Balance>,
        /// Tokens ever credited: treasury reserve, releases and mints.
        total_supply_issued: Balance,

        /// Native value held on behalf of the sale and not yet withdrawn.
        raised_funds: Balance,
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    #[ink(event)]
    pub struct SaleInitialized {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        treasury: AccountId,
        treasury_reserve: Balance,
    }

    #[ink(event)]
    pub struct PhaseChanged {
        old: Phase,
        new: Phase,
    }

    #[ink(event)]
    pub struct PauseToggled {
        paused: bool,
    }

    #[ink(event)]
    pub struct TaxToggled {
        enabled: bool,
    }

    /// `minted_now` is zero while issuance is deferred.
    #[ink(event)]
    pub struct ContributionRecorded {
        #[ink(topic)]
        contributor: AccountId,
        amount: Balance,
        minted_now: Balance,
    }

    #[ink(event)]
    pub struct TokensReleased {
        #[ink(topic)]
        beneficiary: AccountId,
        amount: Balance,
    }

    #[ink(event)]
    pub struct TransferExecuted {
        #[ink(topic)]
        from: AccountId,
        #[ink(topic)]
        to: AccountId,
        net: Balance,
        tax: Balance,
    }

    #[ink(event)]
    pub struct Approval {
        #[ink(topic)]
        owner: AccountId,
        #[ink(topic)]
        spender: AccountId,
        value: Balance,
    }

    #[ink(event)]
    pub struct FundsWithdrawn {
        #[ink(topic)]
        to: AccountId,
        amount: Balance,
    }

    /// Tokens about to be issued, fully checked against the supply cap.
    #[derive(Debug, Clone, Copy)]
    struct Issuance {
        gross: Balance,
        net: Balance,
        tax: Balance,
    }

    // =========================================================================
    // IMPLEMENTATION
    // =========================================================================

    impl SpaceCoinIco {
        /// Deploys the sale. The deployer becomes the owner.
        #[ink(constructor)]
        pub fn new(
            treasury: AccountId,
            whitelist: Vec<AccountId>,
            config: SaleConfig,
        ) -> core::result::Result<Self, Error> {
            config.validate()?;

            let mut listed = Mapping::default();
            let mut whitelist_len: u32 = 0;
            for account in whitelist {
                if !listed.contains(account) {
                    listed.insert(account, &true);
                    whitelist_len += 1;
                }
            }

            let mut balances = Mapping::default();
            if config.treasury_reserve > 0 {
                balances.insert(treasury, &config.treasury_reserve);
            }

            let contract = Self {
                owner: Self::env().caller(),
                treasury,
                total_supply_issued: config.treasury_reserve,
                config,
                phase: Phase::Seed,
                paused: false,
                tax_enabled: false,
                whitelist: listed,
                whitelist_len,
                contributed: Mapping::default(),
                total_contributed: 0,
                pending_credits: Mapping::default(),
                balances,
                allowances: Mapping::default(),
                raised_funds: 0,
            };

            contract.env().emit_event(SaleInitialized {
                owner: contract.owner,
                treasury,
                treasury_reserve: contract.config.treasury_reserve,
            });

            Ok(contract)
        }

        // =================================================================
        // PHASE CONTROLLER
        // =================================================================

        /// Moves the sale to its next phase. Pending credits are not touched.
        #[ink(message)]
        pub fn advance_phase(&mut self) -> Result<Phase> {
            self.ensure_owner()?;
            self.enter_next_phase()
        }

        #[ink(message)]
        pub fn set_paused(&mut self, paused: bool) -> Result<()> {
            self.ensure_owner()?;
            self.paused = paused;
            self.env().emit_event(PauseToggled { paused });
            Ok(())
        }

        #[ink(message)]
        pub fn set_tax_enabled(&mut self, enabled: bool) -> Result<()> {
            self.ensure_owner()?;
            self.tax_enabled = enabled;
            self.env().emit_event(TaxToggled { enabled });
            Ok(())
        }

        fn enter_next_phase(&mut self) -> Result<Phase> {
            let old = self.phase;
            let new = old.next()?;
            self.phase = new;
            self.env().emit_event(PhaseChanged { old, new });
            Ok(new)
        }

        /// Follows every phase whose aggregate cap the last contribution
        /// exhausted exactly.
        fn auto_advance(&mut self) {
            if !self.config.auto_advance {
                return;
            }
            while let Some(cap) = self.phase_cap() {
                if self.total_contributed != cap || self.enter_next_phase().is_err() {
                    break;
                }
            }
        }

        fn phase_cap(&self) -> Option<Balance> {
            match self.phase {
                Phase::Seed => Some(self.config.seed_phase_cap),
                Phase::General => Some(self.config.general_phase_cap),
                Phase::Open => None,
            }
        }

        fn require_active(&self) -> Result<()> {
            if self.paused {
                return Err(Error::SaleOnHold);
            }
            Ok(())
        }

        fn ensure_owner(&self) -> Result<()> {
            if self.env().caller() != self.owner {
                return Err(Error::Unauthorized);
            }
            Ok(())
        }

        // =================================================================
        // CONTRIBUTIONS
        // =================================================================

        /// Contributes the transferred value. Returns the tokens credited to
        /// the caller by this call (zero while issuance is deferred).
        #[ink(message, payable)]
        pub fn contribute(&mut self) -> Result<Balance> {
            let contributor = self.env().caller();
            let amount = self.env().transferred_value();
            self.process_contribution(contributor, amount)
        }

        fn process_contribution(&mut self, contributor: AccountId, amount: Balance) -> Result<Balance> {
            self.require_active()?;

            let contributed = self.contributed_by(contributor);
            let eligibility = Eligibility {
                config: &self.config,
                phase: self.phase,
                whitelisted: self.is_whitelisted(contributor),
                contributed,
                total_contributed: self.total_contributed,
            };
            if let Err(rejection) = eligibility.check(amount) {
                ink::env::debug_println!(
                    "contribution of {} from {:?} rejected: {:?}",
                    amount,
                    contributor,
                    rejection
                );
                return Err(rejection.into());
            }

            let contributed = contributed.checked_add(amount).ok_or(Error::Overflow)?;
            let total_contributed = self.total_contributed.checked_add(amount).ok_or(Error::Overflow)?;
            let raised_funds = self.raised_funds.checked_add(amount).ok_or(Error::Overflow)?;

            let minted_now = if self.phase.defers_issuance() {
                let pending = self
                    .pending_credit_of(contributor)
                    .checked_add(amount)
                    .ok_or(Error::Overflow)?;
                self.pending_credits.insert(contributor, &pending);
                0
            } else {
                self.release_pending(contributor, amount)?
            };

            self.contributed.insert(contributor, &contributed);
            self.total_contributed = total_contributed;
            self.raised_funds = raised_funds;

            self.env().emit_event(ContributionRecorded {
                contributor,
                amount,
                minted_now,
            });

            self.auto_advance();
            Ok(minted_now)
        }

        // =================================================================
        // PENDING / RELEASE
        // =================================================================

        /// Releases `beneficiary`'s pending credit. Anyone may call this for
        /// anyone once the sale is Open; returns the tokens issued.
        #[ink(message)]
        pub fn claim(&mut self, beneficiary: AccountId) -> Result<Balance> {
            if self.phase != Phase::Open {
                return Err(Error::ClaimNotReady);
            }
            self.release_pending(beneficiary, 0)
        }

        /// Issues tokens for the beneficiary's pending credit plus `fresh`
        /// value contributed in Open, as one balance change.
        ///
        /// Everything fallible runs before the pending entry is cleared, so a
        /// failure leaves the credit in place.
        fn release_pending(&mut self, beneficiary: AccountId, fresh: Balance) -> Result<Balance> {
            let pending = self.pending_credit_of(beneficiary);
            let value = pending.checked_add(fresh).ok_or(Error::Overflow)?;
            if value == 0 {
                return Ok(0);
            }

            let released = self.config.tokens_for(pending)?;
            let issuance = self.plan_issuance(value)?;

            if pending > 0 {
                self.pending_credits.remove(beneficiary);
                self.env().emit_event(TokensReleased {
                    beneficiary,
                    amount: released,
                });
            }
            self.apply_issuance(beneficiary, issuance);
            Ok(issuance.gross)
        }

        // =================================================================
        // ISSUANCE
        // =================================================================

        fn plan_issuance(&self, value: Balance) -> Result<Issuance> {
            let gross = self.config.tokens_for(value)?;
            let issued = self.total_supply_issued.checked_add(gross).ok_or(Error::Overflow)?;
            if issued > self.config.max_supply {
                ink::env::debug_println!(
                    "issuing {} would bring supply to {} (max {})",
                    gross,
                    issued,
                    self.config.max_supply
                );
                return Err(Error::SupplyExceeded);
            }

            let (net, tax) = if self.tax_enabled && self.config.tax_on_issuance {
                self.config.split_tax(gross)?
            } else {
                (gross, 0)
            };
            Ok(Issuance { gross, net, tax })
        }

        fn apply_issuance(&mut self, beneficiary: AccountId, issuance: Issuance) {
            self.total_supply_issued += issuance.gross;
            self.credit(beneficiary, issuance.net);
            if issuance.tax > 0 {
                self.credit(self.treasury, issuance.tax);
            }
        }

        /// Balances sum to `total_supply_issued`, so a credit cannot overflow.
        fn credit(&mut self, account: AccountId, amount: Balance) {
            let balance = self.balance_of(account);
            self.balances.insert(account, &balance.saturating_add(amount));
        }

        // =================================================================
        // TRANSFERS
        // =================================================================

        #[ink(message)]
        pub fn transfer(&mut self, to: AccountId, amount: Balance) -> Result<()> {
            let from = self.env().caller();
            self.process_transfer(from, to, amount)
        }

        #[ink(message)]
        pub fn approve(&mut self, spender: AccountId, value: Balance) -> Result<()> {
            let owner = self.env().caller();
            self.allowances.insert((owner, spender), &value);
            self.env().emit_event(Approval { owner, spender, value });
            Ok(())
        }

        #[ink(message)]
        pub fn transfer_from(&mut self, from: AccountId, to: AccountId, amount: Balance) -> Result<()> {
            let spender = self.env().caller();
            self.ensure_transferable(amount)?;
            let allowance = self.allowance(from, spender);
            if allowance < amount {
                return Err(Error::InsufficientAllowance);
            }

            self.process_transfer(from, to, amount)?;
            self.allowances.insert((from, spender), &(allowance - amount));
            Ok(())
        }

        /// Moves `amount` out of `from`; the recipient receives it net of tax
        /// and the treasury receives the tax. Self-transfers and transfers to
        /// the treasury go through the same steps.
        fn process_transfer(&mut self, from: AccountId, to: AccountId, amount: Balance) -> Result<()> {
            self.ensure_transferable(amount)?;

            let from_bal = self.balance_of(from);
            if from_bal < amount {
                return Err(Error::InsufficientBalance);
            }

            let (net, tax) = if self.tax_enabled {
                self.config.split_tax(amount)?
            } else {
                (amount, 0)
            };

            self.balances.insert(from, &(from_bal - amount));
            self.credit(to, net);
            if tax > 0 {
                self.credit(self.treasury, tax);
            }

            self.env().emit_event(TransferExecuted { from, to, net, tax });
            Ok(())
        }

        fn ensure_transferable(&self, amount: Balance) -> Result<()> {
            if self.phase != Phase::Open {
                return Err(Error::TransferNotAllowed);
            }
            if amount == 0 {
                return Err(Error::InvalidAmount);
            }
            Ok(())
        }

        // =================================================================
        // RAISED FUNDS
        // =================================================================

        /// Sends `amount` of the raised native value to the owner.
        #[ink(message)]
        pub fn withdraw_funds(&mut self, amount: Balance) -> Result<()> {
            self.ensure_owner()?;
            if self.phase != Phase::Open {
                return Err(Error::WrongPhase);
            }
            if amount == 0 {
                return Err(Error::InvalidAmount);
            }
            if amount > self.raised_funds {
                return Err(Error::InsufficientFunds);
            }

            self.env()
                .transfer(self.owner, amount)
                .map_err(|_| Error::TransferFailed)?;
            self.raised_funds -= amount;

            self.env().emit_event(FundsWithdrawn {
                to: self.owner,
                amount,
            });
            Ok(())
        }

        // =================================================================
        // VIEW FUNCTIONS
        // =================================================================

        #[ink(message)]
        pub fn balance_of(&self, account: AccountId) -> Balance {
            self.balances.get(account).unwrap_or(0)
        }

        #[ink(message)]
        pub fn allowance(&self, owner: AccountId, spender: AccountId) -> Balance {
            self.allowances.get((owner, spender)).unwrap_or(0)
        }

        #[ink(message)]
        pub fn current_phase(&self) -> Phase {
            self.phase
        }

        /// Value contributed across all phases, including withdrawn value.
        #[ink(message)]
        pub fn total_raised(&self) -> Balance {
            self.total_contributed
        }

        /// Value still held by the sale.
        #[ink(message)]
        pub fn raised_funds(&self) -> Balance {
            self.raised_funds
        }

        #[ink(message)]
        pub fn total_supply(&self) -> Balance {
            self.total_supply_issued
        }

        /// Tokens that can still be issued before `max_supply` is reached.
        #[ink(message)]
        pub fn tokens_left(&self) -> Balance {
            self.config.max_supply.saturating_sub(self.total_supply_issued)
        }

        #[ink(message)]
        pub fn pending_credit_of(&self, account: AccountId) -> Balance {
            self.pending_credits.get(account).unwrap_or(0)
        }

        #[ink(message)]
        pub fn contributed_by(&self, account: AccountId) -> Balance {
            self.contributed.get(account).unwrap_or(0)
        }

        #[ink(message)]
        pub fn is_whitelisted(&self, account: AccountId) -> bool {
            self.whitelist.get(account).unwrap_or(false)
        }

        #[ink(message)]
        pub fn whitelist_len(&self) -> u32 {
            self.whitelist_len
        }

        #[ink(message)]
        pub fn is_paused(&self) -> bool {
            self.paused
        }

        #[ink(message)]
        pub fn is_tax_enabled(&self) -> bool {
            self.tax_enabled
        }

        #[ink(message)]
        pub fn owner(&self) -> AccountId {
            self.owner
        }

        #[ink(message)]
        pub fn treasury(&self) -> AccountId {
            self.treasury
        }

        #[ink(message)]
        pub fn config(&self) -> SaleConfig {
            self.config.clone()
        }
    }

    // =========================================================================
    // UNIT TESTS
    // =========================================================================


    // =========================================================================
    // PROPERTY TESTS
    // =========================================================================

}
