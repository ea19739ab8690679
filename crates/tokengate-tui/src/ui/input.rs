//! Keyboard input handling for the TUI.
//!
//! Translates key events into application state changes, one handler per
//! route plus the help overlay.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use tokengate_core::finance::TransactionField;
use tokengate_core::Route;

use crate::app::{App, AppState, LoginFocus};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Any key closes the help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        app.state = AppState::Normal;
        return Ok(false);
    }

    if key.code == KeyCode::F(1) {
        app.state = AppState::ShowingHelp;
        return Ok(false);
    }

    match app.current_route() {
        Route::Login => handle_login_input(app, key),
        Route::Protected => handle_protected_input(app, key),
        Route::Transactions => handle_transactions_input(app, key),
    }
}

fn quit(app: &mut App) -> Result<bool> {
    app.state = AppState::Quitting;
    Ok(true)
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => return quit(app),
        KeyCode::F(2) => app.navigate(Route::Transactions),
        KeyCode::Down | KeyCode::Tab => app.login_focus = app.login_focus.next(),
        KeyCode::Up | KeyCode::BackTab => app.login_focus = app.login_focus.prev(),
        KeyCode::Enter => match app.login_focus {
            LoginFocus::Username => app.login_focus = LoginFocus::Password,
            // Enter in the password field submits, like a browser form
            LoginFocus::Password | LoginFocus::Button => app.submit_login(),
        },
        KeyCode::Backspace if !app.login.is_loading() => match app.login_focus {
            LoginFocus::Username => {
                app.login.username.pop();
            }
            LoginFocus::Password => {
                app.login.password.pop();
            }
            LoginFocus::Button => {}
        },
        KeyCode::Char(c) if !app.login.is_loading() => match app.login_focus {
            LoginFocus::Username => {
                app.login.push_username_char(c);
            }
            LoginFocus::Password => {
                app.login.push_password_char(c);
            }
            LoginFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

fn handle_protected_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => return quit(app),
        KeyCode::Char('t') => app.navigate(Route::Transactions),
        KeyCode::Char('l') => app.logout(),
        KeyCode::Esc => {
            if !app.go_back() {
                return quit(app);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_transactions_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let focus = app.transactions.focus;
    match key.code {
        KeyCode::Esc => {
            if !app.go_back() {
                return quit(app);
            }
        }
        KeyCode::F(5) => {
            app.status_message = None;
            app.reload();
        }
        KeyCode::Tab => app.focus_next_transaction_field(),
        KeyCode::BackTab => app.focus_prev_transaction_field(),
        KeyCode::Down => app.transactions.select_next(),
        KeyCode::Up => app.transactions.select_prev(),
        KeyCode::Enter => app.submit_transaction(),
        KeyCode::Char(' ') if focus == TransactionField::IsIncome => {
            app.transactions.form.toggle_income();
        }
        KeyCode::Char(c) if !c.is_control() => {
            if let Some(text) = app.transactions.form.text_mut(focus) {
                text.push(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = app.transactions.form.text_mut(focus) {
                text.pop();
            }
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crossterm::event::KeyModifiers;
    use tokengate_core::auth::MemoryTokenStore;
    use tokengate_core::{ApiClient, Config};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        let api = ApiClient::new("http://127.0.0.1:1", "http://127.0.0.1:1").unwrap();
        App::with_services(Config::default(), api, Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn test_typing_into_login_fields() {
        let mut app = app();
        app.login_focus = LoginFocus::Username;
        for c in "bob".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        for c in "pw1".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Backspace)).unwrap();

        assert_eq!(app.login.username, "bob");
        assert_eq!(app.login.password, "pw");
        assert_eq!(app.login_focus, LoginFocus::Password);
    }

    #[test]
    fn test_help_overlay_toggles() {
        let mut app = app();
        handle_input(&mut app, key(KeyCode::F(1))).unwrap();
        assert_eq!(app.state, AppState::ShowingHelp);

        // Closing the overlay swallows the key
        let quit = handle_input(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(!quit);
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_esc_on_login_quits() {
        let mut app = app();
        assert!(handle_input(&mut app, key(KeyCode::Esc)).unwrap());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_transaction_form_editing() {
        let mut app = app();
        app.navigate(Route::Transactions);

        for c in "12.5".chars() {
            handle_input(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        handle_input(&mut app, key(KeyCode::Char('x'))).unwrap();
        handle_input(&mut app, key(KeyCode::Tab)).unwrap();
        handle_input(&mut app, key(KeyCode::Char(' '))).unwrap();

        assert_eq!(app.transactions.form.amount, "12.5");
        assert_eq!(app.transactions.form.description, "x");
        assert!(app.transactions.form.is_income);
        assert_eq!(app.transactions.focus, TransactionField::IsIncome);
    }
}
