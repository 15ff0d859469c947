//! Payment method nonces and the card metadata attached to them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Single-use token standing in for a vaulted or tokenized payment method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentMethodNonce {
    pub nonce: String,
    /// Payment instrument type, e.g. `CreditCard` or `PayPalAccount`.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Instrument-specific details (`bin`, `last_two`, `card_type`,
    /// `payer_info`, ...).
    pub details: Map<String, Value>,
    pub is_default: bool,
    pub three_d_secure_info: Option<ThreeDSecureInfo>,
    pub bin_data: Option<BinData>,
    pub authentication_insight: Option<Value>,
}

impl PaymentMethodNonce {
    /// String-valued entry of `details`.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

/// Outcome of a 3-D Secure authentication.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreeDSecureInfo {
    pub enrolled: Option<String>,
    pub status: Option<String>,
    pub liability_shifted: Option<bool>,
    pub liability_shift_possible: Option<bool>,
    pub cavv: Option<String>,
    pub xid: Option<String>,
    pub ds_transaction_id: Option<String>,
    pub eci_flag: Option<String>,
    pub three_d_secure_version: Option<String>,
}

/// Yes/No answer from the card issuer, or `Unknown` when it has none.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    Yes,
    No,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Issuer metadata looked up from the card's BIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinData {
    pub commercial: Indicator,
    pub debit: Indicator,
    pub durbin_regulated: Indicator,
    pub healthcare: Indicator,
    pub payroll: Indicator,
    pub prepaid: Indicator,
    pub country_of_issuance: String,
    pub issuing_bank: String,
    pub product_id: String,
}

impl Default for BinData {
    fn default() -> Self {
        let unknown = || "Unknown".to_string();
        Self {
            commercial: Indicator::Unknown,
            debit: Indicator::Unknown,
            durbin_regulated: Indicator::Unknown,
            healthcare: Indicator::Unknown,
            payroll: Indicator::Unknown,
            prepaid: Indicator::Unknown,
            country_of_issuance: unknown(),
            issuing_bank: unknown(),
            product_id: unknown(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_card_nonce_with_three_d_secure_and_bin_data() {
        let nonce: PaymentMethodNonce = serde_json::from_value(json!({
            "nonce": "fake-valid-nonce",
            "type": "CreditCard",
            "is_default": false,
            "details": {"bin": "401288", "last_two": "81", "card_type": "Visa"},
            "three_d_secure_info": {
                "enrolled": "Y",
                "status": "authenticate_successful",
                "liability_shifted": true,
                "liability_shift_possible": true,
                "cavv": "cavv_value",
                "xid": "xid_value",
                "ds_transaction_id": "dstrxid",
                "eci_flag": "05",
                "three_d_secure_version": "2.2.0"
            },
            "bin_data": {
                "commercial": "Unknown",
                "debit": "No",
                "durbin_regulated": "Yes",
                "healthcare": "Unknown",
                "payroll": "No",
                "prepaid": "Yes",
                "country_of_issuance": "USA",
                "issuing_bank": "Chase",
                "product_id": "A"
            }
        }))
        .unwrap();

        assert_eq!(nonce.kind.as_deref(), Some("CreditCard"));
        assert_eq!(nonce.detail("last_two"), Some("81"));

        let info = nonce.three_d_secure_info.unwrap();
        assert_eq!(info.liability_shifted, Some(true));
        assert_eq!(info.three_d_secure_version.as_deref(), Some("2.2.0"));

        let bin = nonce.bin_data.unwrap();
        assert_eq!(bin.debit, Indicator::No);
        assert_eq!(bin.prepaid, Indicator::Yes);
        assert_eq!(bin.issuing_bank, "Chase");
    }

    #[test]
    fn absent_metadata_is_none() {
        let nonce: PaymentMethodNonce =
            serde_json::from_value(json!({"nonce": "abc", "type": "PayPalAccount"})).unwrap();
        assert!(nonce.three_d_secure_info.is_none());
        assert!(nonce.bin_data.is_none());
        assert!(nonce.details.is_empty());
    }

    #[test]
    fn unexpected_indicators_and_missing_fields_are_unknown() {
        let bin: BinData =
            serde_json::from_value(json!({"debit": "maybe", "prepaid": "Yes"})).unwrap();
        assert_eq!(bin.debit, Indicator::Unknown);
        assert_eq!(bin.prepaid, Indicator::Yes);
        assert_eq!(bin.healthcare, Indicator::Unknown);
        assert_eq!(bin.country_of_issuance, "Unknown");
    }
}
