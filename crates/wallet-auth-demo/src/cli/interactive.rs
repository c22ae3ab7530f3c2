/*
[INPUT]:  SessionOrchestrator and user menu selections
[OUTPUT]: Rendered session card and orchestrator calls per action
[POS]:    CLI interactive flow
[UPDATE]: When menu actions or their availability change
*/

use anyhow::Result;
use console::style;
use dialoguer::{Input, Select, theme::ColorfulTheme};
use std::fmt;

use wallet_auth_demo::{Session, SessionOrchestrator, SessionState, SessionView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Login,
    RefreshAccount,
    SignMessage,
    Logout,
    Quit,
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::Login => "Login",
            MenuAction::RefreshAccount => "Refresh account",
            MenuAction::SignMessage => "Sign message",
            MenuAction::Logout => "Logout",
            MenuAction::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Actions offered for the current session state
pub fn available_actions(session: &Session) -> Vec<MenuAction> {
    match session.state() {
        SessionState::Idle => vec![MenuAction::Login, MenuAction::Quit],
        SessionState::Authenticated => vec![
            MenuAction::RefreshAccount,
            MenuAction::SignMessage,
            MenuAction::Logout,
            MenuAction::Quit,
        ],
        SessionState::Uninitialized | SessionState::Initializing | SessionState::Failed => {
            vec![MenuAction::Quit]
        }
    }
}

pub async fn run_interactive(orchestrator: &mut SessionOrchestrator) -> Result<()> {
    let theme = ColorfulTheme::default();
    let title = orchestrator.config().ui.app_name.clone();

    loop {
        print_view(&orchestrator.view(), &title);

        let actions = available_actions(orchestrator.session());
        let selection = Select::with_theme(&theme)
            .with_prompt("Select action")
            .items(&actions)
            .default(0)
            .interact()?;

        match actions[selection] {
            MenuAction::Login => {
                if let Err(err) = orchestrator.login().await {
                    err.report("login");
                    if err.is_cancelled() {
                        println!("{}", style("Login cancelled.").yellow());
                    } else {
                        println!("{}", style(format!("Login failed: {err}")).red());
                    }
                }
            }
            MenuAction::RefreshAccount => {
                if let Err(err) = orchestrator.fetch_account_details().await {
                    err.report("fetch_account_details");
                    println!("{}", style("Account details unavailable.").yellow());
                }
            }
            MenuAction::SignMessage => sign_message(orchestrator, &theme).await?,
            MenuAction::Logout => {
                if let Err(err) = orchestrator.logout().await {
                    err.report("logout");
                    println!("{}", style(format!("Logout failed: {err}")).red());
                }
            }
            MenuAction::Quit => return Ok(()),
        }
    }
}

async fn sign_message(orchestrator: &SessionOrchestrator, theme: &ColorfulTheme) -> Result<()> {
    let message: String = Input::with_theme(theme)
        .with_prompt("Message")
        .interact_text()?;

    match orchestrator.sign_message(&message).await {
        Ok(signature) => println!("{} {}", style("Signature:").bold(), signature),
        Err(err) => {
            err.report("sign_message");
            println!("{}", style(format!("Signing failed: {err}")).red());
        }
    }
    Ok(())
}

fn print_view(view: &SessionView, title: &str) {
    println!();
    for (idx, line) in view.render(title).lines().enumerate() {
        if idx == 0 {
            println!("{}", style(line).bold().cyan());
        } else if view.is_login_prompt() {
            println!("{}", style(line).green());
        } else {
            println!("{line}");
        }
    }
}
