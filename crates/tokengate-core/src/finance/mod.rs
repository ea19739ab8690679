//! Finance frontend state: the transaction form and the transaction list.
//!
//! Both are plain state holders. The shell performs the requests with
//! [`ApiClient`](crate::api::ApiClient) and feeds the results back in.

pub mod form;
pub mod list;

pub use form::{TransactionField, TransactionForm, TransactionFormError};
pub use list::{ListState, TransactionsView};
