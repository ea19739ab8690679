//! One-shot commands that run without the terminal UI.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use tokengate_core::api::DEFAULT_TRANSACTION_LIMIT;
use tokengate_core::models::Credentials;
use tokengate_core::utils::{format_amount, format_date, truncate};
use tokengate_core::{AuthGate, Config, GateIntent, LoginFlow, LoginForm, LoginIntent};

/// Column width for descriptions in `--transactions`
const DESCRIPTION_WIDTH: usize = 32;

/// A command selected by the first argument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Login,
    Verify,
    Logout,
    Register,
    Transactions,
}

impl Command {
    pub fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "--login" => Some(Command::Login),
            "--verify" => Some(Command::Verify),
            "--logout" => Some(Command::Logout),
            "--register" => Some(Command::Register),
            "--transactions" => Some(Command::Transactions),
            _ => None,
        }
    }
}

pub async fn run(command: Command, mut config: Config) -> Result<()> {
    match command {
        Command::Login => login(&mut config).await,
        Command::Verify => verify(&config).await,
        Command::Logout => logout(&config),
        Command::Register => register(&config).await,
        Command::Transactions => transactions(&config).await,
    }
}

/// Prompt on stderr and read a line, falling back to `default` when empty
fn prompt(label: &str, default: Option<&str>) -> Result<String> {
    let mut stderr = io::stderr();
    match default {
        Some(d) => write!(stderr, "{} [{}]: ", label, d)?,
        None => write!(stderr, "{}: ", label)?,
    }
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim().to_string();

    Ok(match default {
        Some(d) if value.is_empty() => d.to_string(),
        _ => value,
    })
}

fn prompt_credentials(default_username: Option<&str>) -> Result<Credentials> {
    let username = prompt("Username", default_username)?;
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;
    Ok(Credentials::new(username, password))
}

async fn login(config: &mut Config) -> Result<()> {
    let credentials = prompt_credentials(config.last_username.as_deref())?;
    let api = config.api_client()?;
    let store = config.open_token_store()?;
    let flow = LoginFlow::new(api, store);

    let mut form = LoginForm::new(credentials.username.clone());
    form.password = credentials.password;

    match flow.submit(&mut form).await {
        LoginIntent::Navigate(route) => {
            if let Err(e) = config.remember_username(&form.username) {
                warn!(error = %e, "Failed to save config");
            }
            eprintln!("Logged in as {} (next: {})", form.username, route);
            Ok(())
        }
        LoginIntent::Stay | LoginIntent::Ignored => match form.error() {
            Some(e) => bail!("{}", e),
            None => bail!("Login did not complete"),
        },
    }
}

async fn verify(config: &Config) -> Result<()> {
    let gate = AuthGate::new(config.api_client()?, config.open_token_store()?);
    match gate.activate().await {
        GateIntent::Stay => {
            eprintln!("Token verified");
            Ok(())
        }
        GateIntent::Redirect { to, reason } => {
            info!(to = %to, "Gate redirected");
            bail!("{}", reason)
        }
    }
}

fn logout(config: &Config) -> Result<()> {
    let store = config.open_token_store()?;
    store.clear()?;
    eprintln!("Logged out");
    Ok(())
}

async fn register(config: &Config) -> Result<()> {
    let credentials = prompt_credentials(None)?;
    if !credentials.is_complete() {
        bail!("Username and password are required");
    }
    let user = config.api_client()?.register(&credentials).await?;
    eprintln!("Registered {} (id {})", user.username, user.id);
    Ok(())
}

async fn transactions(config: &Config) -> Result<()> {
    let api = config.api_client()?;
    let list = api.list_transactions(0, DEFAULT_TRANSACTION_LIMIT).await?;

    let mut stdout = io::stdout().lock();
    let mut balance = 0.0;
    for tx in &list {
        balance += tx.signed_amount();
        writeln!(
            stdout,
            "{:<14} {:<width$} {:>14}",
            format_date(&tx.date),
            truncate(&tx.description, DESCRIPTION_WIDTH),
            format_amount(tx.amount, tx.is_income),
            width = DESCRIPTION_WIDTH
        )?;
    }
    writeln!(
        stdout,
        "{} transactions, balance {}",
        list.len(),
        format_amount(balance, balance >= 0.0)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_from_arg() {
        assert_eq!(Command::from_arg("--login"), Some(Command::Login));
        assert_eq!(Command::from_arg("--verify"), Some(Command::Verify));
        assert_eq!(Command::from_arg("--logout"), Some(Command::Logout));
        assert_eq!(Command::from_arg("--register"), Some(Command::Register));
        assert_eq!(Command::from_arg("--transactions"), Some(Command::Transactions));
        assert_eq!(Command::from_arg("login"), None);
    }
}
