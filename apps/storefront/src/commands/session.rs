//! Wallet session and theme commands.

use serde::Serialize;
use tracing::debug;

use aqua_core::{Theme, WalletSession};
use aqua_wallet::{shorten_address, DemoWallet};

use crate::error::ApiError;
use crate::state::StoreEngine;

/// The header's wallet button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub connected: bool,
    pub session: Option<WalletSession>,
    /// `UQBvW8...ggGG`
    pub short_address: Option<String>,
    /// `100.00 TON`
    pub balance_display: Option<String>,
}

impl From<Option<WalletSession>> for SessionResponse {
    fn from(session: Option<WalletSession>) -> Self {
        SessionResponse {
            connected: session.is_some(),
            short_address: session.as_ref().map(|s| shorten_address(&s.wallet_address)),
            balance_display: session.as_ref().map(|s| s.balance.to_string()),
            session,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeResponse {
    pub theme: Theme,
}

pub fn get_session(engine: &StoreEngine) -> SessionResponse {
    debug!("get_session command");
    SessionResponse::from(engine.session())
}

/// Re-reads the wallet and records its session.
pub async fn refresh_session(engine: &StoreEngine) -> Result<SessionResponse, ApiError> {
    debug!("refresh_session command");
    Ok(SessionResponse::from(engine.refresh_session().await?))
}

pub async fn connect_wallet(
    engine: &StoreEngine,
    wallet: &DemoWallet,
    address: &str,
) -> Result<SessionResponse, ApiError> {
    debug!(address = %shorten_address(address), "connect_wallet command");
    wallet.connect(address)?;
    refresh_session(engine).await
}

pub async fn disconnect_wallet(
    engine: &StoreEngine,
    wallet: &DemoWallet,
) -> Result<SessionResponse, ApiError> {
    debug!("disconnect_wallet command");
    wallet.disconnect();
    refresh_session(engine).await
}

pub fn get_theme(engine: &StoreEngine) -> ThemeResponse {
    ThemeResponse {
        theme: engine.theme(),
    }
}

pub async fn set_theme(engine: &StoreEngine, theme: &str) -> Result<ThemeResponse, ApiError> {
    debug!(theme, "set_theme command");
    let theme: Theme = theme
        .parse()
        .map_err(|e: aqua_core::ValidationError| ApiError::validation(e.to_string()))?;
    Ok(ThemeResponse {
        theme: engine.set_theme(theme).await?,
    })
}

pub async fn toggle_theme(engine: &StoreEngine) -> Result<ThemeResponse, ApiError> {
    debug!("toggle_theme command");
    Ok(ThemeResponse {
        theme: engine.toggle_theme().await?,
    })
}
