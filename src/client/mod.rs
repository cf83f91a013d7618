//! Client core: the state container a front end drives, and the pieces that
//! keep it mirrored to the server.
//!
//! [`Store`] holds the five collections and the derived summary. Every
//! mutation is applied locally first through the pure [`reduce`] function;
//! the resulting [`Effect`]s are persisted in the background by the
//! [`sync`] runner, which reports failures as [`Notification`]s and never
//! rolls the local state back.

pub mod api;
pub mod error;
pub mod loader;
pub mod session;
pub mod store;
pub mod sync;
pub mod token;

pub use api::ApiClient;
pub use error::{ClientError, ClientResult};
pub use loader::load_user_data;
pub use session::Session;
pub use store::{reduce, Action, CashFlowState, Effect, InitialState, Modal, ModalType, Store, Transition};
pub use sync::{Notification, SyncRunner};
pub use token::TokenStore;
