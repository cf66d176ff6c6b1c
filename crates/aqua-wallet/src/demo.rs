//! # Demo Wallet
//!
//! A [`PaymentCollaborator`] that behaves like a connected TON wallet without
//! touching a chain: balances are simulated and transactions are "approved"
//! after an optional delay.
//!
//! ## Payment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pay(amount, destination)                                               │
//! │     │                                                                   │
//! │     ├── not connected ─────────────► PaymentError::NotConnected         │
//! │     ├── amount > balance ──────────► PaymentError::InsufficientBalance  │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  TransactionRequest { validUntil: now + 360 s, amount: "450000000" }    │
//! │     │                                                                   │
//! │     ▼  simulated approval (demo_latency), bounded by payment timeout    │
//! │     │                                                                   │
//! │     ├── declined ──────────────────► PaymentError::Rejected             │
//! │     ├── took too long ─────────────► PaymentError::Timeout              │
//! │     ▼                                                                   │
//! │  balance -= amount; Receipt { transaction_id: "TON" + 8 digits, ... }   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, info, warn};

use aqua_core::{PaymentAmount, PaymentError, Receipt, WalletKind, WalletSession};

use crate::address::{shorten_address, validate_address};
use crate::collaborator::PaymentCollaborator;
use crate::config::WalletConfig;
use crate::error::{WalletError, WalletResult};
use crate::readiness::Readiness;
use crate::transaction::TransactionRequest;

#[derive(Debug, Clone)]
struct Account {
    address: String,
    balance: PaymentAmount,
}

#[derive(Debug, Default)]
struct DemoState {
    account: Option<Account>,
    /// Reason the next approval will be declined with, if any.
    decline_next: Option<String>,
    /// The last [`MAX_RECORDED_REQUESTS`] requests, newest last.
    requests: VecDeque<TransactionRequest>,
}

/// How many signing requests the demo wallet remembers.
pub const MAX_RECORDED_REQUESTS: usize = 16;

/// Simulated wallet.
#[derive(Debug)]
pub struct DemoWallet {
    state: Mutex<DemoState>,
    readiness: Readiness,
    starting_balance: PaymentAmount,
    payment_timeout: Duration,
    validity: Duration,
    latency: Duration,
}

impl DemoWallet {
    /// A loaded, disconnected wallet.
    pub fn new(config: &WalletConfig) -> WalletResult<Self> {
        let wallet = Self::unloaded(config)?;
        wallet.readiness.mark_available();
        Ok(wallet)
    }

    /// A wallet whose integration has not finished loading yet.
    ///
    /// Call [`DemoWallet::finish_loading`] to wake readiness waiters.
    pub fn unloaded(config: &WalletConfig) -> WalletResult<Self> {
        Ok(DemoWallet {
            state: Mutex::new(DemoState::default()),
            readiness: Readiness::new(),
            starting_balance: config.demo_balance()?,
            payment_timeout: config.payment_timeout(),
            validity: config.validity(),
            latency: config.demo_latency(),
        })
    }

    pub fn finish_loading(&self) {
        info!("Wallet integration loaded");
        self.readiness.mark_available();
    }

    /// Connects `address` with the configured starting balance.
    pub fn connect(&self, address: &str) -> WalletResult<WalletSession> {
        let address = address.trim();
        validate_address(address)?;

        let mut state = self.lock();
        if let Some(existing) = &state.account {
            return Err(WalletError::AlreadyConnected(existing.address.clone()));
        }

        let account = Account {
            address: address.to_string(),
            balance: self.starting_balance,
        };
        let session = session_of(&account);
        state.account = Some(account);
        info!(address = %shorten_address(address), balance = %self.starting_balance, "Wallet connected");

        Ok(session)
    }

    /// Disconnects; a no-op when already disconnected.
    pub fn disconnect(&self) {
        if self.lock().account.take().is_some() {
            info!("Wallet disconnected");
        }
    }

    /// Makes the next approval fail with [`PaymentError::Rejected`].
    pub fn decline_next(&self, reason: impl Into<String>) {
        self.lock().decline_next = Some(reason.into());
    }

    /// Recent requests the wallet was asked to sign, oldest first.
    pub fn requests(&self) -> Vec<TransactionRequest> {
        self.lock().requests.iter().cloned().collect()
    }

    fn lock(&self) -> MutexGuard<'_, DemoState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Balance and connection checks shared by both phases of `pay`.
    fn check_funds(state: &DemoState, amount: PaymentAmount) -> Result<(), PaymentError> {
        let account = state.account.as_ref().ok_or(PaymentError::NotConnected)?;
        if amount > account.balance {
            return Err(PaymentError::InsufficientBalance {
                required: amount,
                available: account.balance,
            });
        }
        Ok(())
    }

    async fn approve(&self, amount: PaymentAmount, destination: &str) -> Result<Receipt, PaymentError> {
        {
            let mut state = self.lock();
            Self::check_funds(&state, amount)?;
            let request = TransactionRequest::single(amount, destination, self.validity, Utc::now());
            debug!(valid_until = request.valid_until, nano = amount.nano(), "Transaction requested");
            if state.requests.len() == MAX_RECORDED_REQUESTS {
                state.requests.pop_front();
            }
            state.requests.push_back(request);
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let mut state = self.lock();
        if let Some(reason) = state.decline_next.take() {
            return Err(PaymentError::Rejected(reason));
        }

        // The wallet may have been disconnected or drained while approving
        Self::check_funds(&state, amount)?;
        let account = state.account.as_mut().ok_or(PaymentError::NotConnected)?;
        account.balance = account.balance.saturating_sub(amount);

        let paid_at = Utc::now();
        Ok(Receipt {
            transaction_id: format!("TON{:08}", paid_at.timestamp_millis().rem_euclid(100_000_000)),
            amount,
            destination: destination.to_string(),
            paid_at,
        })
    }
}

fn session_of(account: &Account) -> WalletSession {
    WalletSession {
        wallet_address: account.address.clone(),
        balance: account.balance,
        wallet_type: WalletKind::Ton,
    }
}

#[async_trait]
impl PaymentCollaborator for DemoWallet {
    async fn until_available_within(&self, limit: Duration) -> bool {
        self.readiness.until_available_within(limit).await
    }

    fn is_ready(&self) -> bool {
        self.readiness.is_available() && self.lock().account.is_some()
    }

    fn session(&self) -> Option<WalletSession> {
        self.lock().account.as_ref().map(session_of)
    }

    async fn pay(&self, amount: PaymentAmount, destination: &str) -> Result<Receipt, PaymentError> {
        match tokio::time::timeout(self.payment_timeout, self.approve(amount, destination)).await {
            Ok(Ok(receipt)) => {
                info!(transaction_id = %receipt.transaction_id, amount = %amount, "Payment approved");
                Ok(receipt)
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Payment failed");
                Err(e)
            }
            Err(_) => {
                warn!(timeout_secs = self.payment_timeout.as_secs(), "Payment timed out");
                Err(PaymentError::Timeout(self.payment_timeout.as_secs()))
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
