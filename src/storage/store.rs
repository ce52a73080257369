use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Account, AccountId, AccountStatus, Cents, NewAccount};

use super::MIGRATION_001_ACCOUNTS;

const ACCOUNT_COLUMNS: &str =
    "id, customer_id, account_type, balance_cents, currency_code, status, created_at, updated_at";

/// Outcome of an atomic balance adjustment.
#[derive(Debug)]
pub enum AdjustOutcome {
    /// The delta was applied; holds the post-mutation record.
    Adjusted(Account),
    /// No account with the given id exists.
    NotFound,
    /// The account is closed and rejects funds movement.
    Closed,
    /// Applying the delta would drive the balance negative.
    /// Holds the balance observed at the atomic evaluation point.
    Insufficient { balance: Cents },
}

/// Durable, transactional home for account records and the sole writer of
/// balances.
pub struct AccountStore {
    pool: SqlitePool,
}

impl AccountStore {
    /// Create a new store with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_ACCOUNTS)
            .execute(&self.pool)
            .await
            .context("Failed to run accounts migration")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    /// Health check: verify the store answers a trivial query.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("Store did not respond")?;
        Ok(())
    }

    /// Insert a new account. The store assigns id and timestamps; both
    /// timestamps come from the same clock read.
    pub async fn create_account(&self, new: &NewAccount) -> Result<Account> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(&format!(
            r#"
            INSERT INTO accounts (customer_id, account_type, balance_cents, currency_code, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(new.customer_id)
        .bind(&new.account_type)
        .bind(new.balance_cents)
        .bind(&new.currency_code)
        .bind(new.status.as_str())
        .bind(&now)
        .bind(&now)
        .fetch_one(&self.pool)
        .await
        .context("Failed to insert account")?;

        Self::row_to_account(&row)
    }

    /// Get an account by id.
    pub async fn get_account(&self, id: AccountId) -> Result<Option<Account>> {
        let row = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// List a page of accounts in store-stable order (by id).
    pub async fn list_accounts(&self, limit: i64, offset: i64) -> Result<Vec<Account>> {
        let rows = sqlx::query(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Update account type and status. Never touches the balance.
    /// Returns `None` when no account with the given id exists.
    pub async fn update_metadata(
        &self,
        id: AccountId,
        account_type: &str,
        status: AccountStatus,
    ) -> Result<Option<Account>> {
        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(&format!(
            r#"
            UPDATE accounts
            SET account_type = ?, status = ?, updated_at = ?
            WHERE id = ?
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(account_type)
        .bind(status.as_str())
        .bind(&now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update account")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    /// Apply a signed delta to an account balance. This is the sole entry
    /// point for balance change.
    ///
    /// The non-negativity check and the write are one conditional UPDATE,
    /// so two adjustments racing on the same account can never both observe
    /// the same pre-mutation balance. When the statement matches no row,
    /// a follow-up SELECT inside the same transaction tells a missing
    /// account apart from a closed one or an insufficient balance.
    pub async fn adjust_balance(&self, id: AccountId, delta: Cents) -> Result<AdjustOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin balance transaction")?;

        let now = Utc::now().to_rfc3339();

        let row = sqlx::query(&format!(
            r#"
            UPDATE accounts
            SET balance_cents = balance_cents + ?1, updated_at = ?2
            WHERE id = ?3 AND balance_cents + ?1 >= 0 AND status <> 'closed'
            RETURNING {ACCOUNT_COLUMNS}
            "#,
        ))
        .bind(delta)
        .bind(&now)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to adjust balance")?;

        if let Some(row) = row {
            let account = Self::row_to_account(&row)?;
            tx.commit()
                .await
                .context("Failed to commit balance adjustment")?;
            return Ok(AdjustOutcome::Adjusted(account));
        }

        let probe = sqlx::query("SELECT balance_cents, status FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .context("Failed to inspect account")?;

        tx.rollback()
            .await
            .context("Failed to roll back balance transaction")?;

        let Some(probe) = probe else {
            return Ok(AdjustOutcome::NotFound);
        };

        let status: String = probe.get("status");
        if status == AccountStatus::Closed.as_str() {
            Ok(AdjustOutcome::Closed)
        } else {
            Ok(AdjustOutcome::Insufficient {
                balance: probe.get("balance_cents"),
            })
        }
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        let status_str: String = row.get("status");
        let created_at_str: String = row.get("created_at");
        let updated_at_str: String = row.get("updated_at");

        Ok(Account {
            id: row.get("id"),
            customer_id: row.get("customer_id"),
            account_type: row.get("account_type"),
            balance_cents: row.get("balance_cents"),
            currency_code: row.get("currency_code"),
            status: AccountStatus::from_str(&status_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid account status: {}", status_str))?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .context("Invalid created_at timestamp")?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&updated_at_str)
                .context("Invalid updated_at timestamp")?
                .with_timezone(&Utc),
        })
    }
}
