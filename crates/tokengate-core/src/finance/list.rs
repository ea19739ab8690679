use tracing::warn;

use crate::api::ApiError;
use crate::models::{NewTransaction, Transaction};

use super::form::{TransactionField, TransactionForm};

/// Load state of the transaction list
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Loading,
    Loaded(Vec<Transaction>),
    Failed(String),
}

/// Everything the transactions page shows: the list, the form, and the
/// form's submit state.
#[derive(Debug, Clone)]
pub struct TransactionsView {
    pub state: ListState,
    pub form: TransactionForm,
    pub focus: TransactionField,
    pub selection: usize,
    form_error: Option<String>,
    submitting: bool,
}

impl Default for TransactionsView {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionsView {
    /// A fresh page starts out loading
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
            form: TransactionForm::default(),
            focus: TransactionField::Amount,
            selection: 0,
            form_error: None,
            submitting: false,
        }
    }

    pub fn transactions(&self) -> &[Transaction] {
        match &self.state {
            ListState::Loaded(list) => list,
            _ => &[],
        }
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Back to loading, e.g. before a refresh
    pub fn reload(&mut self) {
        self.state = ListState::Loading;
    }

    /// Apply the result of `GET /transactions`
    pub fn apply_loaded(&mut self, result: Result<Vec<Transaction>, ApiError>) {
        self.state = match result {
            Ok(list) => ListState::Loaded(list),
            Err(e) => {
                warn!(error = %e, "Failed to load transactions");
                ListState::Failed(e.to_string())
            }
        };
        self.selection = self
            .selection
            .min(self.transactions().len().saturating_sub(1));
    }

    /// Validate the form and mark it submitting. `None` when invalid (the
    /// error slot is filled) or when a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<NewTransaction> {
        if self.submitting {
            return None;
        }
        match self.form.to_new_transaction() {
            Ok(tx) => {
                self.form_error = None;
                self.submitting = true;
                Some(tx)
            }
            Err(e) => {
                self.form_error = Some(e.to_string());
                None
            }
        }
    }

    /// Apply the result of `POST /transactions`. The created transaction is
    /// appended to a loaded list and the form is reset.
    pub fn apply_created(&mut self, result: Result<Transaction, ApiError>) {
        self.submitting = false;
        match result {
            Ok(tx) => {
                if let ListState::Loaded(list) = &mut self.state {
                    list.push(tx);
                }
                self.form.reset();
                self.focus = TransactionField::Amount;
                self.form_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Failed to create transaction");
                self.form_error = Some(e.to_string());
            }
        }
    }

    /// Income minus expenses over the loaded list
    pub fn balance(&self) -> f64 {
        self.transactions().iter().map(Transaction::signed_amount).sum()
    }

    pub fn select_next(&mut self) {
        let len = self.transactions().len();
        if len > 0 {
            self.selection = (self.selection + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selection = self.selection.saturating_sub(1);
    }
}
