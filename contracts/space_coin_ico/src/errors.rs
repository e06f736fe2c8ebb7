//! Error taxonomy shared by every ledger message.

/// Every way a ledger message can be refused.
///
/// All variants are raised before the first storage write, so a refused
/// message leaves the ledger exactly as it found it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, scale::Encode, scale::Decode)]
#[cfg_attr(feature = "std", derive(scale_info::TypeInfo))]
pub enum Error {
    /// Caller is not the sale owner.
    Unauthorized,
    /// Zero value or zero token amount.
    InvalidAmount,
    /// The sale is paused.
    SaleOnHold,
    /// Seed contributions are restricted to the whitelist.
    NotWhitelisted,
    /// Individual or aggregate Seed cap would be exceeded.
    SeedCapReached,
    /// Individual or aggregate General cap would be exceeded.
    GeneralCapReached,
    /// The fundraising goal would be exceeded.
    GoalReached,
    /// Issuing the tokens would pass the maximum supply.
    SupplyExceeded,
    /// Tokens only move once the sale is Open.
    TransferNotAllowed,
    InsufficientBalance,
    InsufficientAllowance,
    /// Pending credits can only be released in the Open phase.
    ClaimNotReady,
    /// Operation is not available in the current phase.
    WrongPhase,
    /// Withdrawal exceeds the custodied raised value.
    InsufficientFunds,
    /// The sale is already in its final phase.
    PhaseExhausted,
    /// Constructor parameters are inconsistent.
    InvalidConfig,
    Overflow,
    /// The host refused the native value transfer.
    TransferFailed,
}

pub type Result<T> = core::result::Result<T, Error>;
