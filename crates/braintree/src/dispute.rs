//! Dispute records as returned by the gateway.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::search::{MultipleValueField, RangeField, SearchValue, TextField};

macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $wire)] $variant,)+
            /// Value introduced by the gateway after this client was built.
            #[serde(other)]
            Unrecognized,
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                    $name::Unrecognized => "unrecognized",
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl SearchValue for $name {
            fn to_search_value(&self) -> Value {
                Value::String(self.as_str().to_string())
            }
        }
    };
}

wire_enum!(DisputeStatus {
    Accepted => "accepted",
    AutoAccepted => "auto_accepted",
    Disputed => "disputed",
    Expired => "expired",
    Lost => "lost",
    Open => "open",
    UnderReview => "under_review",
    Won => "won",
});

wire_enum!(DisputeKind {
    Chargeback => "chargeback",
    PreArbitration => "pre_arbitration",
    Retrieval => "retrieval",
});

wire_enum!(DisputeReason {
    CancelledRecurringTransaction => "cancelled_recurring_transaction",
    CreditNotProcessed => "credit_not_processed",
    Duplicate => "duplicate",
    Fraud => "fraud",
    General => "general",
    InvalidAccount => "invalid_account",
    NotRecognized => "not_recognized",
    ProductNotReceived => "product_not_received",
    ProductUnsatisfactory => "product_unsatisfactory",
    Retrieval => "retrieval",
    TransactionAmountDiffers => "transaction_amount_differs",
});

wire_enum!(ChargebackProtectionLevel {
    Effortless => "effortless",
    Standard => "standard",
    NotProtected => "not_protected",
});

/// A merchant payment dispute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dispute {
    pub id: String,
    #[serde(deserialize_with = "amount")]
    pub amount_disputed: Option<String>,
    #[serde(deserialize_with = "amount")]
    pub amount_won: Option<String>,
    pub case_number: Option<String>,
    pub chargeback_protection_level: Option<ChargebackProtectionLevel>,
    pub created_at: Option<DateTime<Utc>>,
    pub currency_iso_code: Option<String>,
    pub date_opened: Option<NaiveDate>,
    pub date_won: Option<NaiveDate>,
    pub evidence: Vec<DisputeEvidence>,
    pub graphql_id: Option<String>,
    pub kind: Option<DisputeKind>,
    pub merchant_account_id: Option<String>,
    pub original_dispute_id: Option<String>,
    pub processor_comments: Option<String>,
    pub reason: Option<DisputeReason>,
    pub reason_code: Option<String>,
    pub reason_description: Option<String>,
    pub received_date: Option<NaiveDate>,
    pub reference_number: Option<String>,
    pub reply_by_date: Option<NaiveDate>,
    pub status: Option<DisputeStatus>,
    pub status_history: Vec<DisputeStatusHistory>,
    pub transaction: Option<TransactionDetails>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Document or text submitted against a dispute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputeEvidence {
    pub id: String,
    pub comment: Option<String>,
    pub category: Option<String>,
    pub sequence_number: Option<i64>,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub sent_to_processor_at: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisputeStatusHistory {
    pub status: Option<DisputeStatus>,
    pub timestamp: Option<DateTime<Utc>>,
    pub effective_date: Option<NaiveDate>,
    pub disbursement_date: Option<NaiveDate>,
}

/// The disputed transaction, as summarised on the dispute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionDetails {
    pub id: String,
    #[serde(deserialize_with = "amount")]
    pub amount: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub order_id: Option<String>,
    pub purchase_order_number: Option<String>,
    pub payment_instrument_subtype: Option<String>,
}

/// Search fields accepted by the dispute advanced-search endpoint.
///
/// ```
/// use braintree::{DisputeSearch, DisputeStatus};
///
/// let terms = [
///     DisputeSearch::status().in_list([DisputeStatus::Open, DisputeStatus::UnderReview]),
///     DisputeSearch::amount_disputed().greater_than_or_equal_to("100.00"),
/// ];
/// assert_eq!(terms[0].name(), "status");
/// ```
pub struct DisputeSearch;

impl DisputeSearch {
    pub fn amount_disputed() -> RangeField<String> {
        RangeField::new("amount_disputed")
    }

    pub fn amount_won() -> RangeField<String> {
        RangeField::new("amount_won")
    }

    pub fn case_number() -> TextField {
        TextField::new("case_number")
    }

    pub fn chargeback_protection_level() -> MultipleValueField<ChargebackProtectionLevel> {
        MultipleValueField::new("chargeback_protection_level")
    }

    pub fn customer_id() -> TextField {
        TextField::new("customer_id")
    }

    pub fn disbursement_date() -> RangeField<NaiveDate> {
        RangeField::new("disbursement_date")
    }

    pub fn effective_date() -> RangeField<NaiveDate> {
        RangeField::new("effective_date")
    }

    pub fn id() -> TextField {
        TextField::new("id")
    }

    pub fn kind() -> MultipleValueField<DisputeKind> {
        MultipleValueField::new("kind")
    }

    pub fn merchant_account_id() -> MultipleValueField<String> {
        MultipleValueField::new("merchant_account_id")
    }

    pub fn reason() -> MultipleValueField<DisputeReason> {
        MultipleValueField::new("reason")
    }

    pub fn reason_code() -> MultipleValueField<String> {
        MultipleValueField::new("reason_code")
    }

    pub fn received_date() -> RangeField<NaiveDate> {
        RangeField::new("received_date")
    }

    pub fn reference_number() -> TextField {
        TextField::new("reference_number")
    }

    pub fn reply_by_date() -> RangeField<NaiveDate> {
        RangeField::new("reply_by_date")
    }

    pub fn status() -> MultipleValueField<DisputeStatus> {
        MultipleValueField::new("status")
    }

    pub fn transaction_id() -> TextField {
        TextField::new("transaction_id")
    }

    pub fn transaction_source() -> MultipleValueField<String> {
        MultipleValueField::new("transaction_source")
    }
}

// Amounts arrive as decimal strings, but tolerate bare JSON numbers.
fn amount<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a decimal amount, got {other}"
        ))),
    }
}
