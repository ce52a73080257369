use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Cents;

/// Store-assigned account identifier. Assigned once at creation, never
/// reused or mutated.
pub type AccountId = i64;

/// Opaque reference to the owning customer.
pub type CustomerId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Open for all operations
    Active,
    /// Dormant; funds still move
    Inactive,
    /// Terminal; rejects funds movement
    Closed,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Inactive => "inactive",
            AccountStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "active" => Some(AccountStatus::Active),
            "inactive" => Some(AccountStatus::Inactive),
            "closed" => Some(AccountStatus::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A customer account as stored in the ledger.
/// `balance_cents` is never negative; the store enforces that inside the
/// same atomic statement that applies any balance change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub customer_id: CustomerId,
    /// Free-form classification, e.g. "checking" or "savings"
    pub account_type: String,
    pub balance_cents: Cents,
    /// Three-letter currency code, e.g. "USD"
    pub currency_code: String,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn is_closed(&self) -> bool {
        self.status == AccountStatus::Closed
    }
}

/// A validated account ready for insertion. The store assigns `id`,
/// `created_at` and `updated_at`.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub customer_id: CustomerId,
    pub account_type: String,
    pub balance_cents: Cents,
    pub currency_code: String,
    pub status: AccountStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AccountStatus::Active,
            AccountStatus::Inactive,
            AccountStatus::Closed,
        ] {
            let s = status.as_str();
            assert_eq!(AccountStatus::from_str(s), Some(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(
            AccountStatus::from_str("Active"),
            Some(AccountStatus::Active)
        );
        assert_eq!(
            AccountStatus::from_str("CLOSED"),
            Some(AccountStatus::Closed)
        );
        assert_eq!(AccountStatus::from_str("frozen"), None);
    }

    #[test]
    fn test_is_closed() {
        let account = Account {
            id: 1,
            customer_id: 7,
            account_type: "checking".into(),
            balance_cents: 0,
            currency_code: "USD".into(),
            status: AccountStatus::Closed,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(account.is_closed());
    }
}
