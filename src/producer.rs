//! NATS message producer for estimate responses

use crate::types::EstimateResponse;
use anyhow::Result;
use async_nats::{Client, Subject};
use tracing::debug;

/// Producer for publishing estimate responses to NATS
#[derive(Clone)]
pub struct ResponseProducer {
    client: Client,
    result_subject: String,
}

impl ResponseProducer {
    /// Create a new response producer
    pub fn new(client: Client, result_subject: &str) -> Self {
        Self {
            client,
            result_subject: result_subject.to_string(),
        }
    }

    /// Publish a response to the requester's reply inbox, or to the result
    /// subject when the request carried none
    pub async fn publish(&self, response: &EstimateResponse, reply: Option<Subject>) -> Result<()> {
        let payload = serde_json::to_vec(response)?;

        match reply {
            Some(inbox) => self.client.publish(inbox, payload.into()).await?,
            None => {
                self.client
                    .publish(self.result_subject.clone(), payload.into())
                    .await?
            }
        }

        debug!(
            request_id = %response.request_id,
            status = response.status.as_str(),
            "Published estimate response"
        );

        Ok(())
    }

    /// Get the result subject name
    pub fn result_subject(&self) -> &str {
        &self.result_subject
    }
}
