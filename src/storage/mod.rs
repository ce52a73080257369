mod store;

pub use store::*;

/// SQL migration for the accounts schema
pub const MIGRATION_001_ACCOUNTS: &str = include_str!("migrations/001_accounts.sql");
