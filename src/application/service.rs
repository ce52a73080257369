use crate::domain::{
    format_cents, Account, AccountId, AccountStatus, Cents, CustomerId, NewAccount,
};
use crate::storage::{AccountStore, AdjustOutcome};

use super::AppError;

/// Default page size for listing accounts.
pub const DEFAULT_LIST_LIMIT: i64 = 100;

/// Request to open a new account. Omitted fields fall back to defaults:
/// zero balance, the service's configured currency, active status.
#[derive(Debug, Clone)]
pub struct CreateAccountRequest {
    pub customer_id: CustomerId,
    pub account_type: String,
    pub initial_balance: Option<Cents>,
    pub currency_code: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Point-in-time view of an account balance.
#[derive(Debug, Clone, serde::Serialize)]
pub struct BalanceSnapshot {
    pub account_id: AccountId,
    pub balance_cents: Cents,
    pub currency_code: String,
}

/// Result of a successful deposit or withdrawal.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FundsReceipt {
    pub account_id: AccountId,
    pub balance_cents: Cents,
    pub currency_code: String,
    pub message: String,
}

/// Stateless façade over the account store. This is the only surface any
/// front-end (CLI, API) talks to; it validates inputs, applies defaults,
/// and translates store outcomes into typed errors. Authorization is the
/// caller's problem: by the time an operation runs here, the boundary
/// layer has already vouched for the caller.
pub struct LedgerService {
    store: AccountStore,
    default_currency: String,
}

impl LedgerService {
    /// Create a new ledger service over an existing store.
    pub fn new(store: AccountStore, default_currency: impl Into<String>) -> Self {
        Self {
            store,
            default_currency: default_currency.into(),
        }
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str, default_currency: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = AccountStore::init(&db_url).await?;
        Ok(Self::new(store, default_currency))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str, default_currency: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = AccountStore::connect(&db_url).await?;
        Ok(Self::new(store, default_currency))
    }

    /// Health check against the store.
    pub async fn ping(&self) -> Result<(), AppError> {
        Ok(self.store.ping().await?)
    }

    /// Open a new account.
    pub async fn create_account(&self, req: CreateAccountRequest) -> Result<Account, AppError> {
        if req.customer_id == 0 {
            return Err(AppError::InvalidInput(
                "Customer id is required and must be non-zero".to_string(),
            ));
        }
        let account_type = req.account_type.trim();
        if account_type.is_empty() {
            return Err(AppError::InvalidInput(
                "Account type is required".to_string(),
            ));
        }

        let balance_cents = req.initial_balance.unwrap_or(0);
        if balance_cents < 0 {
            return Err(AppError::InvalidInput(
                "Initial balance must not be negative".to_string(),
            ));
        }

        let currency_code = match req.currency_code {
            Some(code) => normalize_currency(&code)?,
            None => self.default_currency.clone(),
        };

        let new = NewAccount {
            customer_id: req.customer_id,
            account_type: account_type.to_string(),
            balance_cents,
            currency_code,
            status: req.status.unwrap_or(AccountStatus::Active),
        };

        Ok(self.store.create_account(&new).await?)
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: AccountId) -> Result<Account, AppError> {
        self.store
            .get_account(id)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Get the current balance of an account.
    pub async fn get_balance(&self, id: AccountId) -> Result<BalanceSnapshot, AppError> {
        let account = self.get_account(id).await?;
        Ok(BalanceSnapshot {
            account_id: account.id,
            balance_cents: account.balance_cents,
            currency_code: account.currency_code,
        })
    }

    /// List a page of accounts. Defaults: limit 100, offset 0.
    pub async fn list_accounts(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Account>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        let offset = offset.unwrap_or(0);
        if limit < 0 || offset < 0 {
            return Err(AppError::InvalidInput(
                "Limit and offset must not be negative".to_string(),
            ));
        }
        Ok(self.store.list_accounts(limit, offset).await?)
    }

    /// Update account type and status. The balance is untouchable here.
    pub async fn update_account(
        &self,
        id: AccountId,
        account_type: String,
        status: AccountStatus,
    ) -> Result<Account, AppError> {
        let account_type = account_type.trim();
        if account_type.is_empty() {
            return Err(AppError::InvalidInput(
                "Account type is required".to_string(),
            ));
        }

        self.store
            .update_metadata(id, account_type, status)
            .await?
            .ok_or(AppError::AccountNotFound(id))
    }

    /// Deposit funds into an account.
    pub async fn deposit(&self, id: AccountId, amount: Cents) -> Result<FundsReceipt, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Deposit amount must be positive".to_string(),
            ));
        }
        self.apply_delta(id, amount, "Deposited").await
    }

    /// Withdraw funds from an account. There is deliberately no balance
    /// pre-check here: a snapshot taken outside the store's atomic
    /// statement would be stale under concurrent withdrawals.
    pub async fn withdraw(&self, id: AccountId, amount: Cents) -> Result<FundsReceipt, AppError> {
        if amount <= 0 {
            return Err(AppError::InvalidAmount(
                "Withdrawal amount must be positive".to_string(),
            ));
        }
        self.apply_delta(id, -amount, "Withdrew").await
    }

    async fn apply_delta(
        &self,
        id: AccountId,
        delta: Cents,
        verb: &str,
    ) -> Result<FundsReceipt, AppError> {
        match self.store.adjust_balance(id, delta).await? {
            AdjustOutcome::Adjusted(account) => Ok(FundsReceipt {
                account_id: account.id,
                balance_cents: account.balance_cents,
                currency_code: account.currency_code,
                message: format!("{} {}", verb, format_cents(delta.abs())),
            }),
            AdjustOutcome::NotFound => Err(AppError::AccountNotFound(id)),
            AdjustOutcome::Closed => Err(AppError::AccountClosed(id)),
            AdjustOutcome::Insufficient { balance } => Err(AppError::InsufficientFunds {
                account_id: id,
                balance,
                requested: delta.abs(),
            }),
        }
    }
}

/// Validate and uppercase a 3-letter currency code.
fn normalize_currency(code: &str) -> Result<String, AppError> {
    let code = code.trim();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::InvalidInput(format!(
            "Currency code must be three letters, got '{}'",
            code
        )));
    }
    Ok(code.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_currency() {
        assert_eq!(normalize_currency("usd").unwrap(), "USD");
        assert_eq!(normalize_currency(" EUR ").unwrap(), "EUR");
        assert!(normalize_currency("US").is_err());
        assert!(normalize_currency("DOLLARS").is_err());
        assert!(normalize_currency("U5D").is_err());
    }
}
