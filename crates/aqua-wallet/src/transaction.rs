//! Transaction request handed to the wallet for approval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use aqua_core::PaymentAmount;

/// One transfer inside a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
    pub address: String,
    /// Amount in nano units, as a decimal string.
    pub amount: String,
}

/// The payload a TON Connect style wallet signs.
///
/// ```json
/// { "validUntil": 1735689960, "messages": [{ "address": "EQ...", "amount": "450000000" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    /// Unix seconds after which the wallet must refuse to sign.
    pub valid_until: i64,
    pub messages: Vec<TransactionMessage>,
}

impl TransactionRequest {
    /// A single transfer of `amount` to `destination`, valid for `validity`.
    pub fn single(amount: PaymentAmount, destination: &str, validity: Duration, now: DateTime<Utc>) -> Self {
        TransactionRequest {
            valid_until: now.timestamp() + validity.as_secs() as i64,
            messages: vec![TransactionMessage {
                address: destination.to_string(),
                amount: amount.nano().to_string(),
            }],
        }
    }

    /// `true` once `now` is past `valid_until`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.valid_until
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_single_transfer_payload() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let request = TransactionRequest::single(
            PaymentAmount::from_nano(450_000_000),
            "EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t",
            Duration::from_secs(360),
            now,
        );

        assert_eq!(request.valid_until, now.timestamp() + 360);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["messages"][0]["amount"], "450000000");
        assert!(json.get("validUntil").is_some());
    }

    #[test]
    fn test_expiry() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let request =
            TransactionRequest::single(PaymentAmount::zero(), "EQ", Duration::from_secs(360), now);

        assert!(!request.is_expired(now + chrono::Duration::seconds(360)));
        assert!(request.is_expired(now + chrono::Duration::seconds(361)));
    }
}
