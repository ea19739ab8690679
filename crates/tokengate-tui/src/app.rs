//! Application state management for tokengate.
//!
//! `App` is the shell around the core state machines: it owns the router,
//! runs the auth gate when a gated route activates, and performs network
//! calls on background tasks so the draw loop never waits on the network.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use tokengate_core::api::{ApiClient, ApiError, DEFAULT_TRANSACTION_LIMIT};
use tokengate_core::finance::{TransactionField, TransactionsView};
use tokengate_core::models::Transaction;
use tokengate_core::{
    AuthError, AuthGate, Config, GateIntent, LoginFlow, LoginForm, LoginIntent, Route, Router,
    TokenStore,
};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Button,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Button => LoginFocus::Password,
        }
    }
}

/// Where the protected page's gate check stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStatus {
    Checking,
    Passed,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from background tasks.
///
/// Route-bound results carry the activation they were started for; a result
/// for an activation the user has already left is dropped.
enum TaskResult {
    Login(Result<String, AuthError>),
    Gate { activation: u64, intent: GateIntent },
    Transactions {
        activation: u64,
        result: Result<Vec<Transaction>, ApiError>,
    },
    TransactionCreated(Result<Transaction, ApiError>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    login_flow: LoginFlow<ApiClient>,
    gate: AuthGate<ApiClient>,

    // Navigation
    pub router: Router,
    activation: u64,

    // UI State
    pub state: AppState,
    pub login: LoginForm,
    pub login_focus: LoginFocus,
    pub gate_status: GateStatus,
    pub transactions: TransactionsView,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let api = config.api_client()?;
        let store = config.open_token_store()?;
        Ok(Self::with_services(config, api, store))
    }

    pub fn with_services(config: Config, api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        let login_flow = LoginFlow::new(api.clone(), Arc::clone(&store));
        let gate = AuthGate::new(api.clone(), Arc::clone(&store));
        let (task_tx, task_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let login = LoginForm::new(config.last_username.clone().unwrap_or_default());
        let login_focus = if login.username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };

        Self {
            config,
            api,
            store,
            login_flow,
            gate,

            router: Router::default(),
            activation: 0,

            state: AppState::Normal,
            login,
            login_focus,
            gate_status: GateStatus::Checking,
            transactions: TransactionsView::new(),

            task_rx,
            task_tx,

            status_message: None,
        }
    }

    /// The route to open at startup: the gated page if a token is stored
    /// (the gate will check it), the login page otherwise.
    pub fn initial_route(&self) -> Route {
        match self.store.read() {
            Ok(Some(token)) if !token.is_empty() => Route::Protected,
            Ok(_) => Route::Login,
            Err(e) => {
                warn!(error = %e, "Failed to read token store at startup");
                Route::Login
            }
        }
    }

    pub fn current_route(&self) -> Route {
        self.router.current()
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Push a route and activate it
    pub fn navigate(&mut self, route: Route) {
        info!(to = %route, "Navigate");
        self.router.push(route);
        self.activate_current();
    }

    /// Pop one route and re-activate what is underneath, like a browser back.
    /// Returns false when already at the first entry.
    pub fn go_back(&mut self) -> bool {
        if self.router.back().is_some() {
            self.activate_current();
            true
        } else {
            false
        }
    }

    /// Re-run the current route's activation without touching history
    pub fn reload(&mut self) {
        self.activate_current();
    }

    fn activate_current(&mut self) {
        self.activation += 1;
        let activation = self.activation;

        match self.router.current() {
            Route::Login => {
                self.login_focus = if self.login.username.is_empty() {
                    LoginFocus::Username
                } else {
                    LoginFocus::Password
                };
            }
            Route::Protected => {
                self.gate_status = GateStatus::Checking;
                let gate = self.gate.clone();
                let tx = self.task_tx.clone();
                tokio::spawn(async move {
                    let intent = gate.activate().await;
                    let _ = tx.send(TaskResult::Gate { activation, intent }).await;
                });
            }
            Route::Transactions => {
                self.transactions.reload();
                let api = self.api.clone();
                let tx = self.task_tx.clone();
                tokio::spawn(async move {
                    let result = api.list_transactions(0, DEFAULT_TRANSACTION_LIMIT).await;
                    let _ = tx
                        .send(TaskResult::Transactions { activation, result })
                        .await;
                });
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Submit the login form. The exchange runs in the background; the form
    /// shows its loading label until the result arrives.
    pub fn submit_login(&mut self) {
        let credentials = match self.login_flow.begin(&mut self.login) {
            Ok(credentials) => credentials,
            Err(LoginIntent::Ignored) => {
                debug!("Login already in flight");
                return;
            }
            Err(_) => return,
        };

        self.status_message = None;
        let flow = self.login_flow.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = flow.exchange(&credentials).await;
            let _ = tx.send(TaskResult::Login(result)).await;
        });
    }

    /// Drop the stored token and return to the login page
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear token on logout");
        }
        self.status_message = Some("Logged out".to_string());
        self.navigate(Route::Login);
    }

    fn remember_username(&mut self) {
        let username = self.login.username.clone();
        if self.config.last_username.as_deref() == Some(username.as_str()) {
            return;
        }
        if let Err(e) = self.config.remember_username(&username) {
            warn!(error = %e, "Failed to save config");
        }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    pub fn submit_transaction(&mut self) {
        let Some(body) = self.transactions.begin_submit() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = api.create_transaction(&body).await;
            let _ = tx.send(TaskResult::TransactionCreated(result)).await;
        });
    }

    pub fn focus_next_transaction_field(&mut self) {
        self.transactions.focus = self.transactions.focus.next();
    }

    pub fn focus_prev_transaction_field(&mut self) {
        self.transactions.focus = self.transactions.focus.prev();
    }

    pub fn transaction_field_focused(&self, field: TransactionField) -> bool {
        self.transactions.focus == field
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Apply every finished background task
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.apply_task_result(result);
        }
    }

    fn apply_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Login(result) => {
                let succeeded = result.is_ok();
                let intent = self.login_flow.finish(&mut self.login, result);
                if succeeded {
                    self.remember_username();
                }
                match intent {
                    LoginIntent::Navigate(route) if self.router.current() == Route::Login => {
                        self.navigate(route);
                    }
                    LoginIntent::Navigate(_) => {
                        debug!("Login finished after leaving the login page");
                    }
                    LoginIntent::Stay | LoginIntent::Ignored => {}
                }
            }
            TaskResult::Gate { activation, intent } => {
                if activation != self.activation {
                    debug!(activation, "Discarding gate result for a stale activation");
                    return;
                }
                match intent {
                    GateIntent::Stay => self.gate_status = GateStatus::Passed,
                    GateIntent::Redirect { to, reason } => {
                        self.status_message = Some(reason.to_string());
                        self.navigate(to);
                    }
                }
            }
            TaskResult::Transactions { activation, result } => {
                if activation != self.activation {
                    debug!(activation, "Discarding transactions for a stale activation");
                    return;
                }
                self.transactions.apply_loaded(result);
            }
            TaskResult::TransactionCreated(result) => {
                let ok = result.is_ok();
                self.transactions.apply_created(result);
                if ok {
                    self.status_message = Some("Transaction added".to_string());
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tokengate_core::auth::MemoryTokenStore;

    /// Nothing listens here; every request fails fast
    const UNREACHABLE: &str = "http://127.0.0.1:1";

    fn app_with_store(store: Arc<MemoryTokenStore>) -> App {
        let api = ApiClient::new(UNREACHABLE, UNREACHABLE).unwrap();
        App::with_services(Config::default(), api, store)
    }

    async fn drain(app: &mut App) {
        // Wait for the in-flight task and apply its result
        if let Some(result) = app.task_rx.recv().await {
            app.apply_task_result(result);
        }
    }

    #[test]
    fn test_login_focus_cycle() {
        assert_eq!(LoginFocus::Username.next(), LoginFocus::Password);
        assert_eq!(LoginFocus::Button.next(), LoginFocus::Username);
        assert_eq!(LoginFocus::Username.prev(), LoginFocus::Button);
    }

    #[test]
    fn test_initial_route_follows_store() {
        let app = app_with_store(Arc::new(MemoryTokenStore::new()));
        assert_eq!(app.initial_route(), Route::Login);

        let app = app_with_store(Arc::new(MemoryTokenStore::with_token("abc")));
        assert_eq!(app.initial_route(), Route::Protected);
    }

    #[tokio::test]
    async fn test_protected_with_unreachable_backend_returns_to_login() {
        let store = Arc::new(MemoryTokenStore::with_token("abc123"));
        let mut app = app_with_store(store.clone());

        app.navigate(Route::Protected);
        assert_eq!(app.gate_status, GateStatus::Checking);
        drain(&mut app).await;

        assert_eq!(app.current_route(), Route::Login);
        assert_eq!(store.read().unwrap(), None);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Session could not be verified. Please log in again.")
        );
    }

    #[tokio::test]
    async fn test_stale_gate_result_is_discarded() {
        let store = Arc::new(MemoryTokenStore::with_token("abc123"));
        let mut app = app_with_store(store);

        app.navigate(Route::Protected);
        // Leave before the gate answers
        app.router.push(Route::Transactions);
        app.activation += 1;

        let result = app.task_rx.recv().await.unwrap();
        app.apply_task_result(result);

        assert_eq!(app.current_route(), Route::Transactions);
    }

    #[tokio::test]
    async fn test_empty_login_form_shows_missing_fields() {
        let mut app = app_with_store(Arc::new(MemoryTokenStore::new()));
        app.login.username.clear();
        app.login.password.clear();

        app.submit_login();

        assert_eq!(app.login.error(), Some(AuthError::MissingFields));
        assert!(!app.login.is_loading());
    }

    #[tokio::test]
    async fn test_login_failure_surfaces_request_failed() {
        let mut app = app_with_store(Arc::new(MemoryTokenStore::new()));
        app.login.username = "alice".to_string();
        app.login.password = "secret".to_string();

        app.submit_login();
        assert!(app.login.is_loading());
        drain(&mut app).await;

        assert!(!app.login.is_loading());
        assert_eq!(app.login.error(), Some(AuthError::RequestFailed));
        assert_eq!(app.current_route(), Route::Login);
    }

    #[tokio::test]
    async fn test_repeat_navigation_keeps_history_flat() {
        let mut app = app_with_store(Arc::new(MemoryTokenStore::new()));
        app.navigate(Route::Transactions);
        app.navigate(Route::Transactions);
        app.reload();

        assert_eq!(app.router.depth(), 2);
        assert!(app.go_back());
        assert_eq!(app.current_route(), Route::Login);
    }

    #[tokio::test]
    async fn test_logout_clears_and_navigates() {
        let store = Arc::new(MemoryTokenStore::with_token("abc123"));
        let mut app = app_with_store(store.clone());
        app.router.push(Route::Protected);

        app.logout();

        assert_eq!(store.read().unwrap(), None);
        assert_eq!(app.current_route(), Route::Login);
    }
}
