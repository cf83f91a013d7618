use serde::de::DeserializeOwned;

use super::api::ApiClient;
use super::error::{ClientError, ClientResult};
use super::store::InitialState;
use crate::models::Collection;

async fn fetch<T: DeserializeOwned>(api: &ApiClient, collection: Collection) -> ClientResult<Vec<T>> {
    api.list(collection)
        .await
        .map_err(|e| ClientError::Load {
            collection,
            source: Box::new(e),
        })
}

/// Fetch all five collections at once. Any failed fetch fails the whole
/// load; nothing is partially applied.
pub async fn load_user_data(api: &ApiClient) -> ClientResult<InitialState> {
    let (incomes, expenses, assets, liabilities, goals) = tokio::try_join!(
        fetch(api, Collection::Incomes),
        fetch(api, Collection::Expenses),
        fetch(api, Collection::Assets),
        fetch(api, Collection::Liabilities),
        fetch(api, Collection::Goals),
    )?;

    tracing::debug!(
        incomes = incomes.len(),
        expenses = expenses.len(),
        assets = assets.len(),
        liabilities = liabilities.len(),
        goals = goals.len(),
        "Loaded financial data"
    );

    Ok(InitialState::collections(
        incomes,
        expenses,
        assets,
        liabilities,
        goals,
    ))
}
