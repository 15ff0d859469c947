//! Dispute operations.
//!
//! | Method | Path (relative to merchant) | Operation |
//! |--------|-----------------------------|-----------|
//! | PUT    | `/disputes/{id}/accept` | [`DisputeGateway::accept`] |
//! | PUT    | `/disputes/{id}/finalize` | [`DisputeGateway::finalize`] |
//! | POST   | `/disputes/{id}/evidence` | [`DisputeGateway::add_file_evidence`], [`DisputeGateway::add_text_evidence`] |
//! | DELETE | `/disputes/{id}/evidence/{evidence_id}` | [`DisputeGateway::remove_evidence`] |
//! | GET    | `/disputes/{id}` | [`DisputeGateway::find`] |
//! | POST   | `/disputes/advanced_search?page={n}` | [`DisputeGateway::search`] |

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};

use crate::constants::{DISPUTES_KEY, DISPUTE_KEY, EVIDENCE_KEY};
use crate::dispute::{Dispute, DisputeEvidence};
use crate::error::BraintreeError;
use crate::pagination::{PageFetcher, PaginatedCollection, PaginatedResult};
use crate::result::{dispatch, take_field, GatewayResult};
use crate::search::{build_criteria, SearchCriteria, SearchTerm};
use crate::transport::Transport;
use crate::validation::{path_segment, require_id, sequence_number_from_value};

/// Lazily paged dispute search results.
pub type DisputeCollection<T> = PaginatedCollection<DisputePages<T>>;

/// Text evidence to attach to a dispute.
///
/// Plain strings convert into [`EvidenceRequest::Text`], which behaves
/// exactly like a structured request carrying only `content`.
#[derive(Debug, Clone, PartialEq)]
pub enum EvidenceRequest {
    Text(String),
    Structured(TextEvidenceRequest),
    /// Untyped request, e.g. parsed from user input. A JSON string is read
    /// as the shorthand form.
    Json(Value),
}

/// Structured text evidence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextEvidenceRequest {
    pub content: String,
    /// Position of this evidence among the dispute's submissions. Must parse
    /// as an integer.
    pub sequence_number: Option<String>,
    /// Evidence category.
    pub tag: Option<String>,
}

impl TextEvidenceRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn sequence_number(mut self, sequence_number: impl ToString) -> Self {
        self.sequence_number = Some(sequence_number.to_string());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

impl From<&str> for EvidenceRequest {
    fn from(content: &str) -> Self {
        EvidenceRequest::Text(content.to_string())
    }
}

impl From<String> for EvidenceRequest {
    fn from(content: String) -> Self {
        EvidenceRequest::Text(content)
    }
}

impl From<TextEvidenceRequest> for EvidenceRequest {
    fn from(request: TextEvidenceRequest) -> Self {
        EvidenceRequest::Structured(request)
    }
}

impl From<Value> for EvidenceRequest {
    fn from(value: Value) -> Self {
        EvidenceRequest::Json(value)
    }
}

/// Validated evidence, in wire form.
#[derive(Debug, Clone, PartialEq, Serialize)]
struct TextEvidence {
    comments: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sequence_number: Option<i64>,
}

impl EvidenceRequest {
    fn resolve(self) -> Result<TextEvidence, BraintreeError> {
        let (content, sequence_number, tag) = match self {
            EvidenceRequest::Text(content) | EvidenceRequest::Json(Value::String(content)) => {
                (content, Value::Null, Value::Null)
            }
            EvidenceRequest::Structured(req) => (
                req.content,
                req.sequence_number.map_or(Value::Null, Value::String),
                req.tag.map_or(Value::Null, Value::String),
            ),
            EvidenceRequest::Json(Value::Object(mut map)) => {
                let content = match map.remove("content") {
                    Some(Value::String(s)) => s,
                    _ => String::new(),
                };
                (
                    content,
                    map.remove("sequence_number").unwrap_or(Value::Null),
                    map.remove("tag").unwrap_or(Value::Null),
                )
            }
            EvidenceRequest::Json(_) => {
                return Err(BraintreeError::InvalidArgument(
                    "evidence must be a string or an object".into(),
                ))
            }
        };

        if content.trim().is_empty() {
            return Err(BraintreeError::InvalidArgument("content cannot be blank".into()));
        }
        let sequence_number = sequence_number_from_value(&sequence_number)?;
        let category = match tag {
            Value::Null => None,
            Value::String(s) => Some(s),
            _ => return Err(BraintreeError::InvalidArgument("tag must be a string".into())),
        };

        Ok(TextEvidence {
            comments: content,
            category,
            sequence_number,
        })
    }
}

/// Gateway for dispute management.
pub struct DisputeGateway<T> {
    transport: Arc<T>,
    base_path: String,
}

impl<T> Clone for DisputeGateway<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            base_path: self.base_path.clone(),
        }
    }
}

impl<T: Transport> DisputeGateway<T> {
    pub(crate) fn new(transport: Arc<T>, base_path: String) -> Self {
        Self {
            transport,
            base_path,
        }
    }

    fn dispute_path(&self, dispute_id: &str) -> String {
        format!("{}/disputes/{}", self.base_path, path_segment(dispute_id))
    }

    /// Accept liability for a dispute.
    pub async fn accept(&self, dispute_id: &str) -> Result<GatewayResult<()>, BraintreeError> {
        let not_found = || format!("dispute with id '{dispute_id}' not found");
        require_id(dispute_id, not_found)?;

        let path = format!("{}/accept", self.dispute_path(dispute_id));
        let response = self
            .transport
            .put(&path, None)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        dispatch(response, |_| Ok(()))
    }

    /// Finalize a dispute, submitting its evidence to the processor.
    pub async fn finalize(&self, dispute_id: &str) -> Result<GatewayResult<()>, BraintreeError> {
        let not_found = || format!("dispute with id '{dispute_id}' not found");
        require_id(dispute_id, not_found)?;

        let path = format!("{}/finalize", self.dispute_path(dispute_id));
        let response = self
            .transport
            .put(&path, None)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        dispatch(response, |_| Ok(()))
    }

    /// Attach a previously uploaded document as evidence.
    pub async fn add_file_evidence(
        &self,
        dispute_id: &str,
        document_upload_id: &str,
    ) -> Result<GatewayResult<DisputeEvidence>, BraintreeError> {
        let not_found = || format!("dispute with id '{dispute_id}' not found");
        require_id(dispute_id, not_found)?;
        require_id(document_upload_id, || {
            format!("document upload with id '{document_upload_id}' not found")
        })?;

        let path = format!("{}/evidence", self.dispute_path(dispute_id));
        let body = json!({ "document_upload_id": document_upload_id });
        let response = self
            .transport
            .post(&path, &body)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        dispatch(response, |mut body| take_field(&mut body, EVIDENCE_KEY))
    }

    /// Attach text evidence. Accepts a plain string or a structured request.
    pub async fn add_text_evidence(
        &self,
        dispute_id: &str,
        request: impl Into<EvidenceRequest>,
    ) -> Result<GatewayResult<DisputeEvidence>, BraintreeError> {
        let not_found = || format!("dispute with id '{dispute_id}' not found");
        require_id(dispute_id, not_found)?;
        let evidence = request.into().resolve()?;

        let path = format!("{}/evidence", self.dispute_path(dispute_id));
        let body = json!({ "evidence": evidence });
        let response = self
            .transport
            .post(&path, &body)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        dispatch(response, |mut body| take_field(&mut body, EVIDENCE_KEY))
    }

    /// Remove evidence that has not yet been submitted.
    pub async fn remove_evidence(
        &self,
        dispute_id: &str,
        evidence_id: &str,
    ) -> Result<GatewayResult<()>, BraintreeError> {
        let not_found = || {
            format!("evidence with id '{evidence_id}' for dispute with id '{dispute_id}' not found")
        };
        require_id(dispute_id, not_found)?;
        require_id(evidence_id, not_found)?;

        let path = format!(
            "{}/evidence/{}",
            self.dispute_path(dispute_id),
            path_segment(evidence_id)
        );
        let response = self
            .transport
            .delete(&path)
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        dispatch(response, |_| Ok(()))
    }

    pub async fn find(&self, dispute_id: &str) -> Result<Dispute, BraintreeError> {
        let not_found = || format!("dispute with id '{dispute_id}' not found");
        require_id(dispute_id, not_found)?;

        let mut response = self
            .transport
            .get(&self.dispute_path(dispute_id))
            .await
            .map_err(|e| e.describe_not_found(not_found))?;

        take_field(&mut response, DISPUTE_KEY)
    }

    /// Search disputes. No request is made until the returned collection is
    /// iterated; each page is fetched as the caller reaches it.
    pub fn search<I>(&self, terms: I) -> Result<GatewayResult<DisputeCollection<T>>, BraintreeError>
    where
        I: IntoIterator<Item = SearchTerm>,
    {
        let criteria = build_criteria(terms);
        if criteria.is_empty() {
            return Err(BraintreeError::InvalidArgument(
                "search requires at least one criterion".into(),
            ));
        }

        Ok(GatewayResult::Success(PaginatedCollection::new(DisputePages {
            transport: self.transport.clone(),
            base_path: self.base_path.clone(),
            criteria,
        })))
    }
}

/// Page source behind [`DisputeGateway::search`].
pub struct DisputePages<T> {
    transport: Arc<T>,
    base_path: String,
    criteria: SearchCriteria,
}

impl<T> DisputePages<T> {
    pub fn criteria(&self) -> &SearchCriteria {
        &self.criteria
    }
}

impl<T: Transport> PageFetcher for DisputePages<T> {
    type Item = Dispute;

    async fn fetch_page(&self, page: u32) -> Result<PaginatedResult<Dispute>, BraintreeError> {
        let path = format!("{}/disputes/advanced_search?page={page}", self.base_path);
        let body = json!({ "search": self.criteria });
        let mut response = self.transport.post(&path, &body).await?;

        let disputes = response.remove(DISPUTES_KEY).ok_or_else(|| {
            BraintreeError::MalformedResponse(format!("response is missing `{DISPUTES_KEY}`"))
        })?;
        parse_page(disputes)
    }
}

fn parse_page(value: Value) -> Result<PaginatedResult<Dispute>, BraintreeError> {
    let Value::Object(mut page) = value else {
        return Err(BraintreeError::MalformedResponse(format!(
            "`{DISPUTES_KEY}` must be an object"
        )));
    };

    let total_items = count(&page, "total_items")?;
    let page_size = count(&page, "page_size")?;

    // A page holding one record may carry it unwrapped.
    let records = match page.remove(DISPUTE_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items,
        Some(single) => vec![single],
    };
    let items = records
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<Dispute>, _>>()?;

    Ok(PaginatedResult {
        total_items,
        page_size,
        items,
    })
}

fn count(page: &serde_json::Map<String, Value>, key: &str) -> Result<u64, BraintreeError> {
    let parsed = match page.get(key) {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        BraintreeError::MalformedResponse(format!("`{DISPUTES_KEY}.{key}` must be a count"))
    })
}
