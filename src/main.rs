//! House Price Estimator - Main Entry Point
//!
//! Loads the model artifacts, then answers estimate requests received over
//! NATS. Requests are handled concurrently up to the configured worker count.

use anyhow::Result;
use futures::StreamExt;
use house_price_estimator::{
    config::{AppConfig, LoggingConfig},
    consumer::RequestConsumer,
    metrics::{MetricsReporter, ServiceMetrics},
    models::{ArtifactLoader, InferencePipeline},
    producer::ResponseProducer,
    service::EstimateService,
    types::EstimateStatus,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging)?;

    info!("Starting House Price Estimator");

    // Load artifacts eagerly, before accepting any request
    let loader = ArtifactLoader::from_config(&config.artifacts);
    let service = match InferencePipeline::load(&loader) {
        Ok(pipeline) => {
            info!(
                features = pipeline.artifacts().feature_columns().len(),
                model = %pipeline.artifacts().model().name(),
                "Inference pipeline ready"
            );
            EstimateService::new(Arc::new(pipeline))
        }
        Err(e) => {
            error!(error = %e, "Failed to load model artifacts, estimation disabled");
            EstimateService::unavailable()
        }
    };
    let service = Arc::new(service);

    let metrics = Arc::new(ServiceMetrics::new());

    // Connect to NATS
    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(ResponseProducer::new(client.clone(), &config.nats.result_subject));

    let num_workers = config.service.workers.max(1);
    info!(
        workers = num_workers,
        requests = %config.nats.request_subject,
        results = %config.nats.result_subject,
        "Starting request processing loop"
    );

    // Semaphore to limit concurrent processing
    let semaphore = Arc::new(Semaphore::new(num_workers));

    let reporter = MetricsReporter::new(metrics.clone(), config.service.report_interval_secs);
    tokio::spawn(reporter.start());

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = semaphore.clone().acquire_owned().await?;

        let service = service.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            let response = service.handle_payload(&message.payload);
            let processing_time = start_time.elapsed();
            metrics.record_request(response.status, processing_time, response.price);

            if let Err(e) = producer.publish(&response, message.reply.clone()).await {
                error!(
                    request_id = %response.request_id,
                    error = %e,
                    "Failed to publish estimate response"
                );
            } else if response.status == EstimateStatus::Ok {
                debug!(
                    request_id = %response.request_id,
                    price = response.price.unwrap_or_default(),
                    processing_time_us = processing_time.as_micros() as u64,
                    "Estimate published"
                );
            }

            drop(permit);
        });
    }

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format.as_str() {
        "pretty" => builder.pretty().init(),
        _ => builder.json().init(),
    }

    Ok(())
}
