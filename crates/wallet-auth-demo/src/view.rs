/*
[INPUT]:  Session snapshot and chain ticker
[OUTPUT]: Presentation model and plain-text rendering
[POS]:    View layer - loading / login prompt / profile card
[UPDATE]: When displayed profile or account fields change
*/

use std::fmt;

use crate::session::{Session, SessionState};

pub const LOGIN_BUTTON: &str = "[Login with Web3Auth]";
pub const LOGOUT_BUTTON: &str = "[Logout]";

/// What the user sees for the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    Loading,
    Unavailable,
    LoginPrompt,
    Authenticated(ProfileCard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileCard {
    pub greeting: String,
    pub avatar_url: Option<String>,
    /// Empty until account details have been fetched
    pub address: String,
    pub balance: String,
    pub ticker: String,
}

impl SessionView {
    pub fn from_session(session: &Session, ticker: &str) -> Self {
        match session.state() {
            SessionState::Uninitialized | SessionState::Initializing => SessionView::Loading,
            SessionState::Failed => SessionView::Unavailable,
            SessionState::Idle => SessionView::LoginPrompt,
            SessionState::Authenticated => {
                let profile = session.profile();
                SessionView::Authenticated(ProfileCard {
                    greeting: format!(
                        "Welcome, {}",
                        profile.map(|p| p.display_name()).unwrap_or("User")
                    ),
                    avatar_url: profile.and_then(|p| p.avatar_url()).map(str::to_string),
                    address: session.wallet_address().to_string(),
                    balance: session.wallet_balance().to_string(),
                    ticker: ticker.to_string(),
                })
            }
        }
    }

    pub fn is_login_prompt(&self) -> bool {
        matches!(self, SessionView::LoginPrompt)
    }

    /// Text card headed by `title`
    pub fn render(&self, title: &str) -> String {
        let mut lines = vec![title.to_string()];
        match self {
            SessionView::Loading => lines.push("Loading...".to_string()),
            SessionView::Unavailable => {
                lines.push("Login is unavailable: auth client failed to initialize".to_string())
            }
            SessionView::LoginPrompt => lines.push(LOGIN_BUTTON.to_string()),
            SessionView::Authenticated(card) => {
                lines.push(card.greeting.clone());
                if let Some(url) = &card.avatar_url {
                    lines.push(format!("Avatar: {url}"));
                }
                lines.push(format!("Address: {}", or_pending(&card.address)));
                lines.push(format!(
                    "Balance: {} {}",
                    or_pending(&card.balance),
                    card.ticker
                ));
                lines.push(LOGOUT_BUTTON.to_string());
            }
        }
        lines.join("\n")
    }
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionView::Loading => write!(f, "loading"),
            SessionView::Unavailable => write!(f, "unavailable"),
            SessionView::LoginPrompt => write!(f, "login prompt"),
            SessionView::Authenticated(card) => write!(f, "{}", card.greeting),
        }
    }
}

fn or_pending(value: &str) -> &str {
    if value.is_empty() { "-" } else { value }
}
