// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use tallybook::application::{CreateAccountRequest, LedgerService};
use tallybook::domain::Account;
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap(), "USD").await?;
    Ok((service, temp_dir))
}

/// A create request with only the required fields set
pub fn checking_request(customer_id: i64) -> CreateAccountRequest {
    CreateAccountRequest {
        customer_id,
        account_type: "checking".to_string(),
        initial_balance: None,
        currency_code: None,
        status: None,
    }
}

/// Open a plain checking account for the given customer
pub async fn open_checking(service: &LedgerService, customer_id: i64) -> Result<Account> {
    Ok(service.create_account(checking_request(customer_id)).await?)
}
