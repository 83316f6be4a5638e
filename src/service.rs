//! Request handling for the estimation service
//!
//! Decodes and validates a request, runs the pipeline, and decides the
//! user-facing response. This is the only place response text is chosen.

use crate::form::PropertyForm;
use crate::models::inference::InferencePipeline;
use crate::types::EstimateResponse;
use std::sync::Arc;
use tracing::{debug, warn};

/// Handles estimate requests against an optional pipeline.
///
/// Without a pipeline (artifacts failed to load) every request receives the
/// static unavailable notice and nothing is sent to the model.
#[derive(Debug, Clone)]
pub struct EstimateService {
    pipeline: Option<Arc<InferencePipeline>>,
}

impl EstimateService {
    pub fn new(pipeline: Arc<InferencePipeline>) -> Self {
        Self {
            pipeline: Some(pipeline),
        }
    }

    /// Service answering every request as unavailable
    pub fn unavailable() -> Self {
        Self { pipeline: None }
    }

    pub fn is_available(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Handle one raw request payload
    pub fn handle_payload(&self, payload: &[u8]) -> EstimateResponse {
        match serde_json::from_slice::<PropertyForm>(payload) {
            Ok(form) => self.handle(&form),
            Err(e) => {
                warn!(error = %e, "Failed to deserialize estimate request");
                EstimateResponse::rejected(new_request_id(), format!("malformed request: {}", e))
            }
        }
    }

    /// Handle one decoded request
    pub fn handle(&self, form: &PropertyForm) -> EstimateResponse {
        let request_id = form.request_id.clone().unwrap_or_else(new_request_id);

        let Some(pipeline) = &self.pipeline else {
            return EstimateResponse::unavailable(request_id);
        };

        let raw = match form.validate() {
            Ok(raw) => raw,
            Err(e) => {
                debug!(request_id = %request_id, error = %e, "Estimate request rejected");
                return EstimateResponse::rejected(request_id, e.to_string());
            }
        };

        match pipeline.predict(&raw) {
            Ok(price) => EstimateResponse::estimated(request_id, price),
            Err(e) => {
                warn!(request_id = %request_id, error = %e, "Inference failed");
                EstimateResponse::failed(request_id)
            }
        }
    }
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
