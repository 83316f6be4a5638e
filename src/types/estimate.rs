//! Estimate responses sent back to requesters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of an estimate request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateStatus {
    /// Price estimated
    Ok,
    /// Form failed validation; nothing was sent to the model
    Rejected,
    /// Inference failed for this request; the user may resubmit
    Failed,
    /// Artifacts never loaded; estimation is disabled
    Unavailable,
}

impl EstimateStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstimateStatus::Ok => "ok",
            EstimateStatus::Rejected => "rejected",
            EstimateStatus::Failed => "failed",
            EstimateStatus::Unavailable => "unavailable",
        }
    }
}

/// Response published for every estimate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateResponse {
    /// Identifier echoed from the request, or generated
    pub request_id: String,

    /// Request outcome
    pub status: EstimateStatus,

    /// Predicted price in rupiah
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// Price formatted for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_price: Option<String>,

    /// User-facing message for non-ok outcomes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Response generation timestamp
    pub timestamp: DateTime<Utc>,
}

impl EstimateResponse {
    fn base(request_id: String, status: EstimateStatus) -> Self {
        Self {
            request_id,
            status,
            price: None,
            formatted_price: None,
            message: None,
            timestamp: Utc::now(),
        }
    }

    /// Successful estimate
    pub fn estimated(request_id: String, price: f64) -> Self {
        let mut response = Self::base(request_id, EstimateStatus::Ok);
        response.price = Some(price);
        response.formatted_price = Some(crate::currency::format_idr(price));
        response
    }

    /// Form rejected before inference
    pub fn rejected(request_id: String, reason: impl Into<String>) -> Self {
        Self::base(request_id, EstimateStatus::Rejected).with_message(reason)
    }

    /// Generic per-request failure
    pub fn failed(request_id: String) -> Self {
        Self::base(request_id, EstimateStatus::Failed)
            .with_message("Estimation failed, please try again")
    }

    /// Static notice while the model is not loaded
    pub fn unavailable(request_id: String) -> Self {
        Self::base(request_id, EstimateStatus::Unavailable)
            .with_message("Price estimation is unavailable: the model could not be loaded")
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_response_serialization() {
        let response = EstimateResponse::estimated("req_1".to_string(), 5_000_000.0);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(!json.contains("message"));

        let deserialized: EstimateResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.request_id, "req_1");
        assert_eq!(deserialized.price, Some(5_000_000.0));
        assert_eq!(
            deserialized.formatted_price.as_deref(),
            Some("Rp\u{a0}5.000.000,00")
        );
    }

    #[test]
    fn test_failure_responses_carry_no_price() {
        let failed = EstimateResponse::failed("a".to_string());
        assert_eq!(failed.status, EstimateStatus::Failed);
        assert!(failed.price.is_none());
        assert!(failed.message.is_some());

        let unavailable = EstimateResponse::unavailable("b".to_string());
        assert_eq!(unavailable.status, EstimateStatus::Unavailable);
        assert!(unavailable.formatted_price.is_none());
    }
}
