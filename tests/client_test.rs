//! End-to-end tests for the client core against a live server.

mod common;

use cashflow::client::{
    Action, ApiClient, ClientError, Modal, Session, Store, TokenStore,
};
use cashflow::models::{
    Collection, Expense, ExpenseCategory, Frequency, Income, IncomeCategory, IncomeType,
};
use chrono::NaiveDate;
use common::spawn_server;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

fn income(id: &str, amount: f64) -> Income {
    Income {
        id: id.into(),
        source: "Rental flat".into(),
        category: IncomeCategory::RealEstate,
        amount,
        income_type: IncomeType::Passive,
        frequency: Frequency::Monthly,
        notes: Some("Second floor".into()),
        user_id: None,
    }
}

fn expense(id: &str, amount: f64) -> Expense {
    Expense {
        id: id.into(),
        description: "Groceries".into(),
        category: ExpenseCategory::Food,
        amount,
        date: NaiveDate::from_ymd_opt(2024, 5, 4).unwrap(),
        user_id: None,
    }
}

fn new_session(base_url: &str, dir: &TempDir) -> Session {
    let api = ApiClient::new(base_url).unwrap();
    Session::new(api, TokenStore::new(dir.path().join("storage.json")))
}

#[tokio::test]
async fn test_register_persists_token_and_restores() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();

    let mut session = new_session(&server.base_url, &dir);
    let user = assert_ok!(session.register("alice", "secret123", None).await);
    assert_eq!(user.username, "alice");

    let tokens = TokenStore::new(dir.path().join("storage.json"));
    assert!(tokens.token().unwrap().is_some());

    let mut restored = new_session(&server.base_url, &dir);
    let user = restored.restore().await.unwrap().cloned();
    assert_eq!(user.map(|u| u.username).as_deref(), Some("alice"));
    assert!(restored.is_authenticated());
}

#[tokio::test]
async fn test_rejected_token_is_cleared() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let tokens = TokenStore::new(dir.path().join("storage.json"));
    tokens.set_token("stale-token").unwrap();

    let mut session = new_session(&server.base_url, &dir);
    assert_eq!(session.restore().await.unwrap(), None);
    assert!(!session.is_authenticated());
    assert_eq!(tokens.token().unwrap(), None);
}

#[tokio::test]
async fn test_wrong_password() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();

    let mut session = new_session(&server.base_url, &dir);
    assert_ok!(session.register("bob", "secret123", None).await);
    assert_ok!(session.logout().await);

    let err = assert_err!(session.login("bob", "not-it").await);
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Invalid username or password");
}

#[tokio::test]
async fn test_google_callback_url_resolves_user() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();

    let mut first = new_session(&server.base_url, &dir);
    assert_ok!(first.register("carol", "secret123", None).await);
    let token = first.api().unwrap().token().unwrap().to_string();

    let other_dir = TempDir::new().unwrap();
    let mut second = new_session(&server.base_url, &other_dir);
    let url = format!("http://localhost:5173/auth/google/callback?token={}", token);
    let user = assert_ok!(second.complete_google_sign_in(&url).await);
    assert_eq!(user.username, "carol");
}

#[tokio::test]
async fn test_store_syncs_mutations() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let mut session = new_session(&server.base_url, &dir);
    assert_ok!(session.register("dave", "secret123", None).await);

    let (mut store, mut notifications) = Store::new();
    assert_ok!(store.sign_in(session.api().unwrap()).await);
    assert!(store.is_syncing());

    store.dispatch(Action::Add(income("rent", 1200.0).into()));
    store.dispatch(Action::Add(expense("food", 250.0).into()));
    store.dispatch(Action::OpenModal(Modal::add(Collection::Goals)));
    store.settle().await;

    store.dispatch(Action::Update(income("rent", 1300.0).into()));
    store.dispatch(Action::Delete(Collection::Expenses, "food".into()));
    store.settle().await;

    assert!(notifications.try_recv().is_err());
    assert_eq!(store.state().summary.total_income, 1300.0);
    assert_eq!(store.state().summary.passive_income, 1300.0);
    assert_eq!(store.state().summary.total_expenses, 0.0);

    // A second store for the same user sees what the first one persisted.
    let (mut other, _rx) = Store::new();
    assert_ok!(other.sign_in(session.api().unwrap()).await);
    let state = other.state();
    assert_eq!(state.incomes.len(), 1);
    assert_eq!(state.incomes[0].amount, 1300.0);
    assert_eq!(state.incomes[0].notes.as_deref(), Some("Second floor"));
    assert!(state.expenses.is_empty());
    assert_eq!(state.summary, store.state().summary);
}

#[tokio::test]
async fn test_failed_mutation_notifies_and_keeps_local_state() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let mut session = new_session(&server.base_url, &dir);
    assert_ok!(session.register("erin", "secret123", None).await);

    let (mut store, mut notifications) = Store::new();
    assert_ok!(store.sign_in(session.api().unwrap()).await);

    // Negative amounts fail server-side validation.
    store.dispatch(Action::Add(expense("bad", -10.0).into()));
    store.settle().await;

    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.message, "Failed to save expense");
    assert_eq!(notification.collection, Some(Collection::Expenses));
    assert_eq!(store.state().expenses.len(), 1);
    assert_eq!(store.state().summary.total_expenses, -10.0);

    // Updating a record the server never stored fails the same way.
    store.dispatch(Action::Update(expense("bad", 5.0).into()));
    store.settle().await;
    assert_eq!(
        notifications.try_recv().unwrap().message,
        "Failed to update expense"
    );
    assert_eq!(store.state().expenses[0].amount, 5.0);
}

#[tokio::test]
async fn test_failed_load_leaves_state_unchanged() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let mut session = new_session(&server.base_url, &dir);
    assert_ok!(session.register("frank", "secret123", None).await);
    let api = session.api().unwrap();

    let (mut store, mut notifications) = Store::new();
    store.dispatch(Action::Add(expense("local", 75.0).into()));
    let before = store.state().clone();

    // Revoke the token so every fetch is rejected.
    assert_ok!(session.logout().await);
    let err = assert_err!(store.sign_in(api).await);
    assert!(matches!(err, ClientError::Load { .. }));

    assert_eq!(store.state(), &before);
    assert_eq!(
        notifications.try_recv().unwrap().message,
        "Failed to load your financial data"
    );
    assert!(notifications.try_recv().is_err());
}

#[tokio::test]
async fn test_sign_out_clears_store() {
    let server = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let mut session = new_session(&server.base_url, &dir);
    assert_ok!(session.register("gina", "secret123", None).await);

    let (mut store, _rx) = Store::new();
    assert_ok!(store.sign_in(session.api().unwrap()).await);
    store.dispatch(Action::Add(income("salary", 4000.0).into()));

    store.sign_out().await;
    assert_ok!(session.logout().await);

    assert!(!store.is_syncing());
    assert!(store.state().incomes.is_empty());
    assert_eq!(store.state().summary.largest_expense_category, "None");
    assert!(session.user().is_none());
}
