//! # Utility Services
//!
//! Airtime, data, electricity and cable payments made straight from the
//! wallet, outside the cart.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service       Account          Providers                 Amount        │
//! │  ───────────   ──────────────   ───────────────────────   ────────────  │
//! │  airtime       phone number     MTN Airtel Glo 9mobile    free (TON)    │
//! │  data          phone number     MTN Airtel Glo 9mobile    plan          │
//! │  electricity   meter number     AEDC EKEDC IKEDC PHEDC    free (TON)    │
//! │  cable         decoder number   DSTV GOTV Startimes       package       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A service order never touches the cart or a checkout session.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::PaymentAmount;
use crate::validation::ValidationResult;

/// Longest accepted phone, meter or decoder number.
pub const MAX_ACCOUNT_LENGTH: usize = 32;

/// A fixed-price package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePlan {
    pub code: &'static str,
    pub label: &'static str,
    /// Price in hundredths of a TON.
    pub price_hundredths: u64,
}

impl ServicePlan {
    pub fn price(&self) -> PaymentAmount {
        PaymentAmount::from_hundredths(self.price_hundredths)
    }
}

const DATA_PLANS: &[ServicePlan] = &[
    ServicePlan { code: "1gb", label: "1GB", price_hundredths: 50 },
    ServicePlan { code: "2gb", label: "2GB", price_hundredths: 100 },
    ServicePlan { code: "5gb", label: "5GB", price_hundredths: 250 },
    ServicePlan { code: "10gb", label: "10GB", price_hundredths: 500 },
];

const CABLE_PACKAGES: &[ServicePlan] = &[
    ServicePlan { code: "basic", label: "Basic", price_hundredths: 500 },
    ServicePlan { code: "premium", label: "Premium", price_hundredths: 1500 },
    ServicePlan { code: "ultimate", label: "Ultimate", price_hundredths: 2500 },
];

const NETWORKS: &[&str] = &["MTN", "Airtel", "Glo", "9mobile"];
const DISCOS: &[&str] = &["AEDC", "EKEDC", "IKEDC", "PHEDC"];
const CABLE_PROVIDERS: &[&str] = &["DSTV", "GOTV", "Startimes"];

// =============================================================================
// Service Kind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ServiceKind {
    Airtime,
    Data,
    Electricity,
    Cable,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [
        ServiceKind::Airtime,
        ServiceKind::Data,
        ServiceKind::Electricity,
        ServiceKind::Cable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceKind::Airtime => "airtime",
            ServiceKind::Data => "data",
            ServiceKind::Electricity => "electricity",
            ServiceKind::Cable => "cable",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ServiceKind::Airtime => "Buy Airtime",
            ServiceKind::Data => "Buy Data Bundle",
            ServiceKind::Electricity => "Pay Electricity Bill",
            ServiceKind::Cable => "Renew Cable TV",
        }
    }

    /// What the account field holds.
    pub fn account_label(&self) -> &'static str {
        match self {
            ServiceKind::Airtime | ServiceKind::Data => "phone number",
            ServiceKind::Electricity => "meter number",
            ServiceKind::Cable => "decoder number",
        }
    }

    pub fn providers(&self) -> &'static [&'static str] {
        match self {
            ServiceKind::Airtime | ServiceKind::Data => NETWORKS,
            ServiceKind::Electricity => DISCOS,
            ServiceKind::Cable => CABLE_PROVIDERS,
        }
    }

    /// Fixed packages; empty when the amount is free-form.
    pub fn plans(&self) -> &'static [ServicePlan] {
        match self {
            ServiceKind::Data => DATA_PLANS,
            ServiceKind::Cable => CABLE_PACKAGES,
            ServiceKind::Airtime | ServiceKind::Electricity => &[],
        }
    }

    /// Turns the amount argument into a price: a plan code for data and
    /// cable, a decimal TON amount otherwise.
    pub fn resolve_amount(&self, raw: &str) -> ValidationResult<PaymentAmount> {
        let raw = raw.trim();
        let plans = self.plans();

        let amount = if plans.is_empty() {
            raw.parse::<PaymentAmount>()?
        } else {
            plans
                .iter()
                .find(|p| p.code.eq_ignore_ascii_case(raw) || p.label.eq_ignore_ascii_case(raw))
                .map(ServicePlan::price)
                .ok_or_else(|| ValidationError::InvalidFormat {
                    field: "plan".to_string(),
                    reason: format!(
                        "one of {}",
                        plans.iter().map(|p| p.code).collect::<Vec<_>>().join(", ")
                    ),
                })?
        };

        if amount.is_zero() {
            return Err(ValidationError::MustBePositive {
                field: "amount".to_string(),
            });
        }
        Ok(amount)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        ServiceKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "service".to_string(),
                reason: "expected airtime, data, electricity or cable".to_string(),
            })
    }
}

// =============================================================================
// Service Order
// =============================================================================

/// A validated request to pay for a utility service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ServiceOrder {
    pub service: ServiceKind,
    /// Phone, meter or decoder number.
    pub account: String,
    /// Network, disco or cable provider, in its canonical spelling.
    pub provider: String,
    pub amount: PaymentAmount,
}

impl ServiceOrder {
    /// Validates the form fields and resolves the price.
    ///
    /// ## Errors
    /// - `Required` / `TooLong` for the account
    /// - `InvalidFormat` for an unknown provider, plan or malformed account
    /// - `MustBePositive` for a zero amount
    pub fn new(service: ServiceKind, account: &str, provider: &str, amount: &str) -> ValidationResult<Self> {
        let account = account.trim();
        if account.is_empty() {
            return Err(ValidationError::Required {
                field: "account".to_string(),
            });
        }
        if account.len() > MAX_ACCOUNT_LENGTH {
            return Err(ValidationError::TooLong {
                field: "account".to_string(),
                max: MAX_ACCOUNT_LENGTH,
            });
        }
        let digits_only = account
            .strip_prefix('+')
            .unwrap_or(account)
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-');
        if !digits_only {
            return Err(ValidationError::InvalidFormat {
                field: "account".to_string(),
                reason: format!("{} must be digits", service.account_label()),
            });
        }

        let provider = service
            .providers()
            .iter()
            .find(|p| p.eq_ignore_ascii_case(provider.trim()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "provider".to_string(),
                reason: format!("one of {}", service.providers().join(", ")),
            })?;

        Ok(ServiceOrder {
            service,
            account: account.to_string(),
            provider: provider.to_string(),
            amount: service.resolve_amount(amount)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_service_kind() {
        assert_eq!("Cable".parse::<ServiceKind>().unwrap(), ServiceKind::Cable);
        assert_eq!(" airtime ".parse::<ServiceKind>().unwrap(), ServiceKind::Airtime);
        assert!("insurance".parse::<ServiceKind>().is_err());
    }

    #[test]
    fn test_plan_prices() {
        assert_eq!(ServiceKind::Data.resolve_amount("2GB").unwrap().to_string(), "1.00 TON");
        assert_eq!(ServiceKind::Cable.resolve_amount("premium").unwrap().to_string(), "15.00 TON");
        assert!(ServiceKind::Cable.resolve_amount("3.5").is_err());
        assert!(ServiceKind::Data.resolve_amount("3gb").is_err());
    }

    #[test]
    fn test_free_amounts() {
        assert_eq!(ServiceKind::Airtime.resolve_amount("0.75").unwrap().nano(), 750_000_000);
        assert!(matches!(
            ServiceKind::Electricity.resolve_amount("0"),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(ServiceKind::Airtime.resolve_amount("abc").is_err());
    }

    #[test]
    fn test_order_validation() {
        let order = ServiceOrder::new(ServiceKind::Airtime, "+234 803 555 0101", "mtn", "2").unwrap();
        assert_eq!(order.provider, "MTN");
        assert_eq!(order.amount, PaymentAmount::from_hundredths(200));

        assert!(matches!(
            ServiceOrder::new(ServiceKind::Electricity, "  ", "AEDC", "1"),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            ServiceOrder::new(ServiceKind::Cable, "7012345678", "Netflix", "basic"),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!(matches!(
            ServiceOrder::new(ServiceKind::Data, "080-CALL-ME", "Glo", "1gb"),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }
}
