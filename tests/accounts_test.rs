mod common;

use anyhow::Result;
use common::{checking_request, open_checking, test_service};
use tallybook::application::{AppError, CreateAccountRequest};
use tallybook::domain::AccountStatus;

#[tokio::test]
async fn test_create_applies_defaults() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = open_checking(&service, 7).await?;

    assert_eq!(account.customer_id, 7);
    assert_eq!(account.account_type, "checking");
    assert_eq!(account.balance_cents, 0);
    assert_eq!(account.currency_code, "USD");
    assert_eq!(account.status, AccountStatus::Active);
    assert!(account.updated_at >= account.created_at);

    Ok(())
}

#[tokio::test]
async fn test_create_with_explicit_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = service
        .create_account(CreateAccountRequest {
            customer_id: 42,
            account_type: "savings".to_string(),
            initial_balance: Some(25000),
            currency_code: Some("eur".to_string()),
            status: Some(AccountStatus::Inactive),
        })
        .await?;

    assert_eq!(account.balance_cents, 25000);
    assert_eq!(account.currency_code, "EUR"); // normalized to uppercase
    assert_eq!(account.status, AccountStatus::Inactive);

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_missing_required_fields() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.create_account(checking_request(0)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got: {err}");

    let err = service
        .create_account(CreateAccountRequest {
            customer_id: 7,
            account_type: "  ".to_string(),
            initial_balance: None,
            currency_code: None,
            status: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got: {err}");

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_negative_initial_balance() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let mut request = checking_request(7);
    request.initial_balance = Some(-100);

    let err = service.create_account(request).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got: {err}");

    Ok(())
}

#[tokio::test]
async fn test_create_rejects_malformed_currency() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for bad in ["US", "DOLLARS", "U5D", ""] {
        let mut request = checking_request(7);
        request.currency_code = Some(bad.to_string());
        let err = service.create_account(request).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)), "'{bad}': {err}");
    }

    Ok(())
}

#[tokio::test]
async fn test_ids_are_store_assigned_and_distinct() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let first = open_checking(&service, 1).await?;
    let second = open_checking(&service, 2).await?;

    assert_ne!(first.id, second.id);
    assert_eq!(service.get_account(first.id).await?.customer_id, 1);
    assert_eq!(service.get_account(second.id).await?.customer_id, 2);

    Ok(())
}

#[tokio::test]
async fn test_get_unknown_account_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.get_account(999).await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(999)), "got: {err}");

    let err = service.get_balance(999).await.unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(999)), "got: {err}");

    Ok(())
}

#[tokio::test]
async fn test_list_pagination() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for customer in 1..=5 {
        open_checking(&service, customer).await?;
    }

    // Defaults return the whole (small) set in id order
    let all = service.list_accounts(None, None).await?;
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    let page = service.list_accounts(Some(2), Some(2)).await?;
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].id, all[2].id);
    assert_eq!(page[1].id, all[3].id);

    let past_end = service.list_accounts(Some(10), Some(100)).await?;
    assert!(past_end.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_list_rejects_negative_page_values() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let err = service.list_accounts(Some(-1), None).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got: {err}");

    let err = service.list_accounts(None, Some(-5)).await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got: {err}");

    Ok(())
}

#[tokio::test]
async fn test_update_changes_metadata_only() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = open_checking(&service, 7).await?;
    service.deposit(account.id, 5000).await?;

    let updated = service
        .update_account(account.id, "savings".to_string(), AccountStatus::Inactive)
        .await?;

    assert_eq!(updated.account_type, "savings");
    assert_eq!(updated.status, AccountStatus::Inactive);
    assert_eq!(updated.balance_cents, 5000, "update must not touch balance");
    assert!(updated.updated_at >= account.updated_at);

    Ok(())
}

#[tokio::test]
async fn test_update_validates_and_propagates_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let account = open_checking(&service, 7).await?;

    let err = service
        .update_account(account.id, "".to_string(), AccountStatus::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)), "got: {err}");

    let err = service
        .update_account(999, "savings".to_string(), AccountStatus::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AccountNotFound(999)), "got: {err}");

    Ok(())
}

#[tokio::test]
async fn test_ping() -> Result<()> {
    let (service, _temp) = test_service().await?;
    service.ping().await?;
    Ok(())
}
