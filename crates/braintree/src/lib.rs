//! # braintree
//!
//! Async client for the Braintree gateway API: dispute management and
//! payment method nonce lookup.
//!
//! # Modules
//!
//! - [`dispute_gateway`]: accept, finalize, evidence, find, and paged search
//! - [`payment_method_nonce_gateway`]: create and find nonces
//! - [`search`]: search field builders and criteria folding
//! - [`pagination`]: lazily fetched result streams
//! - [`result`]: [`GatewayResult`] and API error payloads
//! - [`transport`]: the [`Transport`] seam; [`HttpTransport`] is the reqwest implementation
//! - [`config`]: environments and credentials
//!
//! # Example
//!
//! ```no_run
//! use braintree::{BraintreeGateway, Configuration, DisputeSearch, DisputeStatus};
//! use futures::StreamExt;
//!
//! # async fn run() -> Result<(), braintree::BraintreeError> {
//! let gateway = BraintreeGateway::new(Configuration::from_env()?)?;
//!
//! let dispute = gateway.dispute().find("dispute_id").await?;
//! println!("{} is {:?}", dispute.id, dispute.status);
//!
//! if let Some(open) = gateway
//!     .dispute()
//!     .search([DisputeSearch::status().in_list([DisputeStatus::Open])])?
//!     .success()
//! {
//!     let mut disputes = std::pin::pin!(open.items());
//!     while let Some(dispute) = disputes.next().await {
//!         println!("{}", dispute?.id);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

pub mod config;
pub mod constants;
pub mod dispute;
pub mod dispute_gateway;
pub mod error;
pub mod http_client;
pub mod pagination;
pub mod payment_method_nonce;
pub mod payment_method_nonce_gateway;
pub mod result;
pub mod search;
pub mod transport;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ConfigError, Configuration, Environment};
pub use dispute::{
    ChargebackProtectionLevel, Dispute, DisputeEvidence, DisputeKind, DisputeReason,
    DisputeSearch, DisputeStatus, DisputeStatusHistory, TransactionDetails,
};
pub use dispute_gateway::{
    DisputeCollection, DisputeGateway, DisputePages, EvidenceRequest, TextEvidenceRequest,
};
pub use error::BraintreeError;
pub use http_client::HttpTransport;
pub use pagination::{PageFetcher, PaginatedCollection, PaginatedResult};
pub use payment_method_nonce::{BinData, Indicator, PaymentMethodNonce, ThreeDSecureInfo};
pub use payment_method_nonce_gateway::{
    PaymentMethodNonceCreateRequest, PaymentMethodNonceGateway,
};
pub use result::{ErrorResult, GatewayResult, ValidationError, ValidationErrors};
pub use search::{MultipleValueField, RangeField, SearchCriteria, SearchTerm, SearchValue, TextField};
pub use transport::{ResponseBody, Transport};

/// Entry point: holds the configuration and a shared transport, and hands
/// out per-resource gateways.
pub struct BraintreeGateway<T = HttpTransport> {
    config: Configuration,
    transport: Arc<T>,
}

impl BraintreeGateway<HttpTransport> {
    pub fn new(config: Configuration) -> Result<Self, BraintreeError> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> BraintreeGateway<T> {
    pub fn with_transport(config: Configuration, transport: T) -> Self {
        Self {
            config,
            transport: Arc::new(transport),
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn dispute(&self) -> DisputeGateway<T> {
        DisputeGateway::new(self.transport.clone(), self.config.base_merchant_path())
    }

    pub fn payment_method_nonce(&self) -> PaymentMethodNonceGateway<T> {
        PaymentMethodNonceGateway::new(self.transport.clone(), self.config.base_merchant_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use serde_json::json;

    #[tokio::test]
    async fn gateways_share_the_merchant_base_path() {
        let config =
            Configuration::new(Environment::Sandbox, "merchant one", "pub", "priv").unwrap();
        let gateway = BraintreeGateway::with_transport(config, RecordingTransport::new());

        gateway.transport.respond(json!({"dispute": {"id": "dsp_1"}}));
        gateway.dispute().find("dsp_1").await.unwrap();

        gateway
            .transport
            .respond(json!({"payment_method_nonce": {"nonce": "n1"}}));
        gateway.payment_method_nonce().find("n1").await.unwrap();

        let paths: Vec<String> = gateway
            .transport
            .requests()
            .into_iter()
            .map(|r| r.path)
            .collect();
        assert_eq!(
            paths,
            [
                "/merchants/merchant%20one/disputes/dsp_1",
                "/merchants/merchant%20one/payment_method_nonces/n1",
            ]
        );
    }
}
