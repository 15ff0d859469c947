use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::PAYMENT_METHOD_NONCE_KEY;
use crate::error::BraintreeError;
use crate::payment_method_nonce::PaymentMethodNonce;
use crate::result::{dispatch, take_field, GatewayResult};
use crate::transport::Transport;
use crate::validation::{path_segment, require_id};

/// Optional parameters for [`PaymentMethodNonceGateway::create`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PaymentMethodNonceCreateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merchant_account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_insight: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_insight_options: Option<Value>,
}

impl PaymentMethodNonceCreateRequest {
    pub fn merchant_account_id(mut self, id: impl Into<String>) -> Self {
        self.merchant_account_id = Some(id.into());
        self
    }

    /// Request an authentication insight, optionally for a given amount.
    pub fn authentication_insight(mut self, amount: Option<&str>) -> Self {
        self.authentication_insight = Some(true);
        if let Some(amount) = amount {
            self.authentication_insight_options = Some(json!({ "amount": amount }));
        }
        self
    }
}

/// Gateway for creating and looking up payment method nonces.
pub struct PaymentMethodNonceGateway<T> {
    transport: Arc<T>,
    base_path: String,
}

impl<T> Clone for PaymentMethodNonceGateway<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            base_path: self.base_path.clone(),
        }
    }
}

impl<T: Transport> PaymentMethodNonceGateway<T> {
    pub(crate) fn new(transport: Arc<T>, base_path: String) -> Self {
        Self {
            transport,
            base_path,
        }
    }

    /// Mint a fresh nonce for a vaulted payment method.
    pub async fn create(
        &self,
        payment_method_token: &str,
        request: PaymentMethodNonceCreateRequest,
    ) -> Result<GatewayResult<PaymentMethodNonce>, BraintreeError> {
        let not_found =
            || format!("payment method with token '{payment_method_token}' not found");
        require_id(payment_method_token, not_found)?;

        let path = format!(
            "{}/payment_methods/{}/nonces",
            self.base_path,
            path_segment(payment_method_token)
        );
        let body = json!({ PAYMENT_METHOD_NONCE_KEY: request });
        let response = self
            .transport
            .post(&path, &body)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        dispatch(response, |mut body| {
            take_field(&mut body, PAYMENT_METHOD_NONCE_KEY)
        })
    }

    pub async fn find(&self, nonce: &str) -> Result<PaymentMethodNonce, BraintreeError> {
        let not_found = || format!("payment method nonce with id '{nonce}' not found");
        require_id(nonce, not_found)?;

        let path = format!(
            "{}/payment_method_nonces/{}",
            self.base_path,
            path_segment(nonce)
        );
        let mut response = self
            .transport
            .get(&path)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        take_field(&mut response, PAYMENT_METHOD_NONCE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment_method_nonce::Indicator;
    use crate::testing::RecordingTransport;

    fn gateway(transport: &Arc<RecordingTransport>) -> PaymentMethodNonceGateway<RecordingTransport> {
        PaymentMethodNonceGateway::new(transport.clone(), "/merchants/m1".to_string())
    }

    #[tokio::test]
    async fn blank_inputs_fail_fast() {
        let transport = Arc::new(RecordingTransport::new());
        let gw = gateway(&transport);

        assert!(gw.find(" ").await.unwrap_err().is_not_found());
        assert!(gw
            .create("", PaymentMethodNonceCreateRequest::default())
            .await
            .unwrap_err()
            .is_not_found());
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn create_posts_options_and_returns_nonce() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(json!({"payment_method_nonce": {"nonce": "new-nonce", "type": "CreditCard"}}));

        let nonce = gateway(&transport)
            .create(
                "tok_1",
                PaymentMethodNonceCreateRequest::default()
                    .merchant_account_id("acct_eur")
                    .authentication_insight(Some("10.00")),
            )
            .await
            .unwrap()
            .success()
            .unwrap();
        assert_eq!(nonce.nonce, "new-nonce");

        let req = &transport.requests()[0];
        assert_eq!(req.method, "POST");
        assert_eq!(req.path, "/merchants/m1/payment_methods/tok_1/nonces");
        assert_eq!(
            req.body,
            Some(json!({"payment_method_nonce": {
                "merchant_account_id": "acct_eur",
                "authentication_insight": true,
                "authentication_insight_options": {"amount": "10.00"}
            }}))
        );
    }

    #[tokio::test]
    async fn create_without_options_sends_empty_object() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(json!({"payment_method_nonce": {"nonce": "n"}}));

        gateway(&transport)
            .create("tok_1", PaymentMethodNonceCreateRequest::default())
            .await
            .unwrap();
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({"payment_method_nonce": {}}))
        );
    }

    #[tokio::test]
    async fn create_reports_api_errors_as_error_result() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(json!({"api_error_response": {
            "message": "Merchant account is invalid",
            "errors": {"payment_method_nonce": {"errors": [
                {"attribute": "merchant_account_id", "code": "93105", "message": "Merchant account is invalid"}
            ]}}
        }}));

        let result = gateway(&transport)
            .create("tok_1", PaymentMethodNonceCreateRequest::default())
            .await
            .unwrap();
        assert_eq!(result.error().unwrap().message, "Merchant account is invalid");
    }

    #[tokio::test]
    async fn not_found_messages_name_the_resource() {
        let transport = Arc::new(RecordingTransport::new());
        transport.fail(BraintreeError::NotFound("resource not found".into()));
        transport.fail(BraintreeError::NotFound("resource not found".into()));
        let gw = gateway(&transport);

        match gw.find("missing").await.unwrap_err() {
            BraintreeError::NotFound(msg) => {
                assert_eq!(msg, "payment method nonce with id 'missing' not found")
            }
            other => panic!("expected NotFound, got: {other:?}"),
        }
        match gw
            .create("gone", PaymentMethodNonceCreateRequest::default())
            .await
            .unwrap_err()
        {
            BraintreeError::NotFound(msg) => {
                assert_eq!(msg, "payment method with token 'gone' not found")
            }
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn find_decodes_bin_data() {
        let transport = Arc::new(RecordingTransport::new());
        transport.respond(json!({"payment_method_nonce": {
            "nonce": "fake-valid-debit-nonce",
            "type": "CreditCard",
            "bin_data": {"debit": "Yes", "country_of_issuance": "CAN"}
        }}));

        let nonce = gateway(&transport).find("fake-valid-debit-nonce").await.unwrap();
        let bin = nonce.bin_data.unwrap();
        assert_eq!(bin.debit, Indicator::Yes);
        assert_eq!(bin.prepaid, Indicator::Unknown);
        assert_eq!(bin.country_of_issuance, "CAN");
        assert_eq!(
            transport.requests()[0].path,
            "/merchants/m1/payment_method_nonces/fake-valid-debit-nonce"
        );
    }
}
