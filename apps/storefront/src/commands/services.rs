//! Utility service commands: airtime, data, electricity and cable paid in TON.

use serde::Serialize;
use tracing::debug;

use aqua_core::{Receipt, ServiceKind, ServiceOrder};

use crate::commands::session::SessionResponse;
use crate::error::ApiError;
use crate::state::StoreEngine;

/// A priced package as the service form lists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanOption {
    pub code: String,
    pub label: String,
    /// `2.50 TON`
    pub price_display: String,
}

/// Everything needed to render one service form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceForm {
    pub service: ServiceKind,
    pub title: String,
    pub account_label: String,
    pub providers: Vec<String>,
    /// Empty when the amount is typed in.
    pub plans: Vec<PlanOption>,
}

impl From<ServiceKind> for ServiceForm {
    fn from(service: ServiceKind) -> Self {
        ServiceForm {
            service,
            title: service.title().to_string(),
            account_label: service.account_label().to_string(),
            providers: service.providers().iter().map(|p| p.to_string()).collect(),
            plans: service
                .plans()
                .iter()
                .map(|p| PlanOption {
                    code: p.code.to_string(),
                    label: p.label.to_string(),
                    price_display: p.price().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePaymentResponse {
    pub order: ServiceOrder,
    pub receipt: Receipt,
    /// Wallet session with the new balance.
    pub session: SessionResponse,
}

pub fn list_services() -> Vec<ServiceForm> {
    ServiceKind::ALL.into_iter().map(ServiceForm::from).collect()
}

/// Validates the form and pays through the connected wallet.
///
/// `amount` is a TON amount for airtime and electricity, a plan code for
/// data (`1gb`, ...) and cable (`basic`, ...).
pub async fn pay_service(
    engine: &StoreEngine,
    service: &str,
    account: &str,
    provider: &str,
    amount: &str,
) -> Result<ServicePaymentResponse, ApiError> {
    debug!(service, provider, amount, "pay_service command");

    let to_api = |e: aqua_core::ValidationError| ApiError::validation(e.to_string());
    let service: ServiceKind = service.parse().map_err(to_api)?;
    let order = ServiceOrder::new(service, account, provider, amount).map_err(to_api)?;

    let receipt = engine.pay_service(&order).await?;
    Ok(ServicePaymentResponse {
        order,
        receipt,
        session: SessionResponse::from(engine.session()),
    })
}
