use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{CreateAccountRequest, LedgerService};
use crate::domain::{format_cents, parse_cents, Account, AccountStatus};

/// Tallybook - customer account ledger
#[derive(Parser)]
#[command(name = "tallybook")]
#[command(about = "A SQLite-backed customer account ledger with atomic balance operations")]
#[command(version)]
pub struct Cli {
    /// Database file path (falls back to $LEDGER_DB, then "tallybook.db")
    #[arg(short, long)]
    pub database: Option<String>,

    /// Default currency code for new accounts (falls back to $LEDGER_CURRENCY, then "USD")
    #[arg(short, long)]
    pub currency: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Check that the store is reachable
    Status,

    /// Account management commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Show the balance of an account
    Balance {
        /// Account id
        id: i64,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Deposit funds into an account
    Deposit {
        /// Account id
        id: i64,

        /// Amount to deposit (e.g., "150.00" or "150")
        amount: String,
    },

    /// Withdraw funds from an account
    Withdraw {
        /// Account id
        id: i64,

        /// Amount to withdraw (e.g., "150.00" or "150")
        amount: String,
    },
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// Open a new account
    Create {
        /// Owning customer id
        #[arg(long)]
        customer: i64,

        /// Account type (e.g., "checking", "savings")
        #[arg(long = "type")]
        account_type: String,

        /// Initial balance (e.g., "100.00", defaults to 0)
        #[arg(short, long)]
        balance: Option<String>,

        /// Currency code (defaults to the configured currency)
        #[arg(long)]
        currency: Option<String>,

        /// Initial status: active, inactive, closed (defaults to active)
        #[arg(long)]
        status: Option<String>,
    },

    /// Show an account
    Show {
        /// Account id
        id: i64,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// List accounts
    List {
        /// Maximum number of accounts to return
        #[arg(long)]
        limit: Option<i64>,

        /// Number of accounts to skip
        #[arg(long)]
        offset: Option<i64>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Update account type and status (never the balance)
    Update {
        /// Account id
        id: i64,

        /// New account type
        #[arg(long = "type")]
        account_type: String,

        /// New status: active, inactive, closed
        #[arg(long)]
        status: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Configuration is resolved once here, before any command runs.
        let database = resolve(self.database.clone(), "LEDGER_DB", "tallybook.db");
        let default_currency = resolve(self.currency.clone(), "LEDGER_CURRENCY", "USD");

        if self.verbose {
            eprintln!("[tallybook] database: {}", database);
        }

        match self.command {
            Commands::Init => {
                LedgerService::init(&database, &default_currency).await?;
                println!("Database initialized: {}", database);
            }

            Commands::Status => {
                let service = LedgerService::connect(&database, &default_currency).await?;
                service.ping().await?;
                println!("status: ok");
            }

            Commands::Account(account_cmd) => {
                let service = LedgerService::connect(&database, &default_currency).await?;
                run_account_command(&service, account_cmd).await?;
            }

            Commands::Balance { id, format } => {
                let service = LedgerService::connect(&database, &default_currency).await?;
                let snapshot = service.get_balance(id).await?;

                if format == "json" {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                } else {
                    println!(
                        "Account {}: {} {}",
                        snapshot.account_id,
                        format_cents(snapshot.balance_cents),
                        snapshot.currency_code
                    );
                }
            }

            Commands::Deposit { id, amount } => {
                let service = LedgerService::connect(&database, &default_currency).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '150.00' or '150'")?;

                let receipt = service.deposit(id, amount_cents).await?;
                println!(
                    "{}. New balance: {} {}",
                    receipt.message,
                    format_cents(receipt.balance_cents),
                    receipt.currency_code
                );
            }

            Commands::Withdraw { id, amount } => {
                let service = LedgerService::connect(&database, &default_currency).await?;
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '150.00' or '150'")?;

                let receipt = service.withdraw(id, amount_cents).await?;
                println!(
                    "{}. New balance: {} {}",
                    receipt.message,
                    format_cents(receipt.balance_cents),
                    receipt.currency_code
                );
            }
        }

        Ok(())
    }
}

async fn run_account_command(service: &LedgerService, cmd: AccountCommands) -> Result<()> {
    match cmd {
        AccountCommands::Create {
            customer,
            account_type,
            balance,
            currency,
            status,
        } => {
            let initial_balance = balance
                .map(|b| parse_cents(&b))
                .transpose()
                .context("Invalid balance format. Use '100.00' or '100'")?;

            let status = status
                .map(|s| {
                    AccountStatus::from_str(&s).with_context(|| {
                        format!("Invalid status '{}'. Use active, inactive or closed", s)
                    })
                })
                .transpose()?;

            let account = service
                .create_account(CreateAccountRequest {
                    customer_id: customer,
                    account_type,
                    initial_balance,
                    currency_code: currency,
                    status,
                })
                .await?;

            println!("Created account {}", account.id);
            print_account(&account);
        }

        AccountCommands::Show { id, format } => {
            let account = service.get_account(id).await?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&account)?);
            } else {
                print_account(&account);
            }
        }

        AccountCommands::List {
            limit,
            offset,
            format,
        } => {
            let accounts = service.list_accounts(limit, offset).await?;
            if format == "json" {
                println!("{}", serde_json::to_string_pretty(&accounts)?);
            } else {
                print_account_table(&accounts);
            }
        }

        AccountCommands::Update {
            id,
            account_type,
            status,
        } => {
            let status = AccountStatus::from_str(&status).with_context(|| {
                format!("Invalid status '{}'. Use active, inactive or closed", status)
            })?;

            let account = service.update_account(id, account_type, status).await?;
            println!("Updated account {}", account.id);
            print_account(&account);
        }
    }

    Ok(())
}

fn print_account(account: &Account) {
    println!("  Customer:  {}", account.customer_id);
    println!("  Type:      {}", account.account_type);
    println!(
        "  Balance:   {} {}",
        format_cents(account.balance_cents),
        account.currency_code
    );
    println!("  Status:    {}", account.status);
    println!("  Created:   {}", account.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("  Updated:   {}", account.updated_at.format("%Y-%m-%d %H:%M:%S"));
}

fn print_account_table(accounts: &[Account]) {
    if accounts.is_empty() {
        println!("No accounts found");
        return;
    }

    println!(
        "{:>6}  {:>10}  {:<12}  {:>14}  {:<4}  {:<8}",
        "ID", "CUSTOMER", "TYPE", "BALANCE", "CUR", "STATUS"
    );
    println!("{}", "-".repeat(66));

    for account in accounts {
        println!(
            "{:>6}  {:>10}  {:<12}  {:>14}  {:<4}  {:<8}",
            account.id,
            account.customer_id,
            truncate(&account.account_type, 12),
            format_cents(account.balance_cents),
            account.currency_code,
            account.status
        );
    }

    println!("{} account(s)", accounts.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

/// Resolve a config value: explicit flag, then environment, then default.
fn resolve(flag: Option<String>, env_key: &str, default: &str) -> String {
    flag.or_else(|| std::env::var(env_key).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| default.to_string())
}
