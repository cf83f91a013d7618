use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::api::ApiClient;
use super::error::{ClientError, ClientResult};
use super::loader::load_user_data;
use super::sync::{Notification, SyncRunner};
use crate::models::{
    Asset, Collection, Expense, FinancialSnapshot, FinancialSummary, Goal, Income, Liability,
    Record,
};

/// Which entity form is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalType {
    #[default]
    None,
    Add(Collection),
    Edit(Collection),
}

/// Transient UI selection: the open form and, for edits, the record it is
/// seeded with.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Modal {
    pub kind: ModalType,
    pub data: Option<Record>,
}

impl Modal {
    pub fn add(collection: Collection) -> Self {
        Self {
            kind: ModalType::Add(collection),
            data: None,
        }
    }

    pub fn edit(record: Record) -> Self {
        Self {
            kind: ModalType::Edit(record.collection()),
            data: Some(record),
        }
    }

    pub fn is_open(&self) -> bool {
        self.kind != ModalType::None
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CashFlowState {
    pub incomes: Vec<Income>,
    pub expenses: Vec<Expense>,
    pub assets: Vec<Asset>,
    pub liabilities: Vec<Liability>,
    pub goals: Vec<Goal>,
    pub modal: Modal,
    pub summary: FinancialSummary,
}

impl CashFlowState {
    fn recompute_summary(&mut self) {
        self.summary = FinancialSummary::compute(
            &self.incomes,
            &self.expenses,
            &self.assets,
            &self.liabilities,
        );
    }

    /// The five collections, for the assistant.
    pub fn snapshot(&self) -> FinancialSnapshot {
        FinancialSnapshot {
            incomes: self.incomes.clone(),
            expenses: self.expenses.clone(),
            assets: self.assets.clone(),
            liabilities: self.liabilities.clone(),
            goals: self.goals.clone(),
        }
    }

    pub fn len(&self, collection: Collection) -> usize {
        match collection {
            Collection::Incomes => self.incomes.len(),
            Collection::Expenses => self.expenses.len(),
            Collection::Assets => self.assets.len(),
            Collection::Liabilities => self.liabilities.len(),
            Collection::Goals => self.goals.len(),
        }
    }

    fn push(&mut self, record: Record) {
        match record {
            Record::Income(r) => self.incomes.push(r),
            Record::Expense(r) => self.expenses.push(r),
            Record::Asset(r) => self.assets.push(r),
            Record::Liability(r) => self.liabilities.push(r),
            Record::Goal(r) => self.goals.push(r),
        }
    }

    fn replace(&mut self, record: Record) {
        match record {
            Record::Income(r) => replace_by_id(&mut self.incomes, r, |x| x.id.as_str()),
            Record::Expense(r) => replace_by_id(&mut self.expenses, r, |x| x.id.as_str()),
            Record::Asset(r) => replace_by_id(&mut self.assets, r, |x| x.id.as_str()),
            Record::Liability(r) => replace_by_id(&mut self.liabilities, r, |x| x.id.as_str()),
            Record::Goal(r) => replace_by_id(&mut self.goals, r, |x| x.id.as_str()),
        }
    }

    fn remove(&mut self, collection: Collection, id: &str) {
        match collection {
            Collection::Incomes => self.incomes.retain(|x| x.id != id),
            Collection::Expenses => self.expenses.retain(|x| x.id != id),
            Collection::Assets => self.assets.retain(|x| x.id != id),
            Collection::Liabilities => self.liabilities.retain(|x| x.id != id),
            Collection::Goals => self.goals.retain(|x| x.id != id),
        }
    }
}

fn replace_by_id<T>(items: &mut [T], record: T, id: impl Fn(&T) -> &str) {
    if let Some(i) = items.iter().position(|x| id(x) == id(&record)) {
        items[i] = record;
    }
}

/// A partial state: every `Some` field replaces the current one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InitialState {
    pub incomes: Option<Vec<Income>>,
    pub expenses: Option<Vec<Expense>>,
    pub assets: Option<Vec<Asset>>,
    pub liabilities: Option<Vec<Liability>>,
    pub goals: Option<Vec<Goal>>,
    pub modal: Option<Modal>,
}

impl InitialState {
    /// All five collections, as fetched after sign-in.
    pub fn collections(
        incomes: Vec<Income>,
        expenses: Vec<Expense>,
        assets: Vec<Asset>,
        liabilities: Vec<Liability>,
        goals: Vec<Goal>,
    ) -> Self {
        Self {
            incomes: Some(incomes),
            expenses: Some(expenses),
            assets: Some(assets),
            liabilities: Some(liabilities),
            goals: Some(goals),
            modal: None,
        }
    }

    /// Empty collections and a closed modal.
    pub fn reset() -> Self {
        Self {
            modal: Some(Modal::default()),
            ..Self::collections(Vec::new(), Vec::new(), Vec::new(), Vec::new(), Vec::new())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetInitialState(InitialState),
    Add(Record),
    Update(Record),
    Delete(Collection, String),
    OpenModal(Modal),
    CloseModal,
    UpdateSummary,
}

/// A persistence request produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Create(Record),
    Update(Record),
    Delete { collection: Collection, id: String },
}

impl Effect {
    pub fn collection(&self) -> Collection {
        match self {
            Effect::Create(r) | Effect::Update(r) => r.collection(),
            Effect::Delete { collection, .. } => *collection,
        }
    }

    /// The message shown when the request fails.
    pub fn failure_message(&self) -> String {
        let verb = match self {
            Effect::Create(_) => "save",
            Effect::Update(_) => "update",
            Effect::Delete { .. } => "delete",
        };
        format!("Failed to {} {}", verb, self.collection().noun())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: CashFlowState,
    pub effects: Vec<Effect>,
}

/// Apply one action. Never fails: an update or delete for an unknown id
/// leaves the collection as it was.
pub fn reduce(mut state: CashFlowState, action: Action) -> Transition {
    let mut effects = Vec::new();

    match action {
        Action::SetInitialState(initial) => {
            if let Some(incomes) = initial.incomes {
                state.incomes = incomes;
            }
            if let Some(expenses) = initial.expenses {
                state.expenses = expenses;
            }
            if let Some(assets) = initial.assets {
                state.assets = assets;
            }
            if let Some(liabilities) = initial.liabilities {
                state.liabilities = liabilities;
            }
            if let Some(goals) = initial.goals {
                state.goals = goals;
            }
            if let Some(modal) = initial.modal {
                state.modal = modal;
            }
            state.recompute_summary();
        }
        Action::Add(record) => {
            effects.push(Effect::Create(record.clone()));
            state.push(record);
            state.recompute_summary();
        }
        Action::Update(record) => {
            effects.push(Effect::Update(record.clone()));
            state.replace(record);
            state.recompute_summary();
        }
        Action::Delete(collection, id) => {
            state.remove(collection, &id);
            state.recompute_summary();
            effects.push(Effect::Delete { collection, id });
        }
        Action::OpenModal(modal) => state.modal = modal,
        Action::CloseModal => state.modal = Modal::default(),
        Action::UpdateSummary => state.recompute_summary(),
    }

    Transition { state, effects }
}

/// Owns the state for one signed-in (or anonymous) session.
///
/// While signed in, effects are handed to a [`SyncRunner`]; otherwise changes
/// stay local. Failures arrive on the receiver returned by [`Store::new`].
pub struct Store {
    state: CashFlowState,
    notifier: UnboundedSender<Notification>,
    runner: Option<SyncRunner>,
}

impl Store {
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (notifier, receiver) = mpsc::unbounded_channel();
        let store = Self {
            state: CashFlowState::default(),
            notifier,
            runner: None,
        };
        (store, receiver)
    }

    pub fn state(&self) -> &CashFlowState {
        &self.state
    }

    pub fn is_syncing(&self) -> bool {
        self.runner.is_some()
    }

    pub fn dispatch(&mut self, action: Action) {
        let Transition { state, effects } = reduce(std::mem::take(&mut self.state), action);
        self.state = state;

        match &mut self.runner {
            Some(runner) => {
                for effect in effects {
                    runner.spawn(effect);
                }
            }
            None if !effects.is_empty() => {
                tracing::debug!(count = effects.len(), "Not signed in, keeping changes local");
            }
            None => {}
        }
    }

    /// Start syncing through `api` and load the user's data.
    pub async fn sign_in(&mut self, api: ApiClient) -> ClientResult<()> {
        if api.token().is_none() {
            return Err(ClientError::Unauthenticated);
        }
        self.runner = Some(SyncRunner::new(api, self.notifier.clone()));
        self.load().await
    }

    /// Fetch all five collections and replace the local ones. On failure the
    /// state is left untouched.
    pub async fn load(&mut self) -> ClientResult<()> {
        let api = match &self.runner {
            Some(runner) => runner.api().clone(),
            None => return Err(ClientError::Unauthenticated),
        };

        match load_user_data(&api).await {
            Ok(initial) => {
                self.dispatch(Action::SetInitialState(initial));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error loading data: {}", e);
                let _ = self
                    .notifier
                    .send(Notification::error("Failed to load your financial data", None));
                Err(e)
            }
        }
    }

    /// Stop syncing and clear everything. Pending requests still complete.
    pub async fn sign_out(&mut self) {
        if let Some(mut runner) = self.runner.take() {
            runner.settle().await;
        }
        self.dispatch(Action::SetInitialState(InitialState::reset()));
    }

    /// Wait for every request issued so far.
    pub async fn settle(&mut self) {
        if let Some(runner) = &mut self.runner {
            runner.settle().await;
        }
    }
}
