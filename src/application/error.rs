use thiserror::Error;

use crate::domain::{AccountId, Cents};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    #[error("Account {0} is closed")]
    AccountClosed(AccountId),

    #[error(
        "Insufficient funds in account {account_id}: balance {balance}, requested {requested}"
    )]
    InsufficientFunds {
        account_id: AccountId,
        balance: Cents,
        requested: Cents,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl AppError {
    /// True for transient store failures the caller may safely retry
    /// (balance adjustments are atomic, so a failed attempt never partially
    /// applies).
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Storage(_))
    }
}
