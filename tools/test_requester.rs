//! Test Estimate Requester
//!
//! Generates property forms and sends them to the estimation service over
//! NATS, logging each response.
//!
//! Usage: test_requester [nats_url] [subject] [count] [invalid_rate] [delay_ms]

use house_price_estimator::form::GARAGE_RANGE;
use house_price_estimator::{City, PropertyForm};
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

/// Form generator for testing
struct FormGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl FormGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    fn next_id(&mut self) -> String {
        self.request_counter += 1;
        format!("req_{:08}", self.request_counter)
    }

    /// Generate a form within every input bound
    fn generate_valid(&mut self) -> PropertyForm {
        let area = (self.rng.gen_range(3..=100) * 10) as f64;
        let building_area = ((self.rng.gen_range(3..=80) * 10) as f64).min(area.max(30.0));

        PropertyForm {
            request_id: Some(self.next_id()),
            area,
            building_area,
            bedrooms: self.rng.gen_range(1..=10),
            bathrooms: self.rng.gen_range(1..=8),
            garage: self.rng.gen_range(0..=5),
            city: City::ALL[self.rng.gen_range(0..City::ALL.len())]
                .as_str()
                .to_string(),
        }
    }

    /// Generate a form the service must reject
    fn generate_invalid(&mut self) -> PropertyForm {
        let mut form = self.generate_valid();
        match self.rng.gen_range(0..4) {
            0 => form.area = self.rng.gen_range(1000.5..5000.0),
            1 => form.bedrooms = 0,
            2 => form.garage = self.rng.gen_range(GARAGE_RANGE.end() + 1..20),
            _ => form.city = "Surabaya".to_string(),
        }
        form
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_requester=info".parse()?),
        )
        .init();

    info!("Starting Test Estimate Requester");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args.get(2).map(|s| s.as_str()).unwrap_or("estimates.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(20);
    let invalid_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.1);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        invalid_rate = invalid_rate,
        delay_ms = delay_ms,
        "Configuration loaded"
    );

    let client = match async_nats::connect(nats_url).await {
        Ok(c) => {
            info!("Connected to NATS");
            c
        }
        Err(e) => {
            warn!(error = %e, "Failed to connect to NATS. Running in dry-run mode.");
            return run_dry_mode(count, invalid_rate, delay_ms).await;
        }
    };

    let mut generator = FormGenerator::new();
    let mut rng = rand::thread_rng();

    for _ in 0..count {
        let form = if rng.gen_bool(invalid_rate) {
            generator.generate_invalid()
        } else {
            generator.generate_valid()
        };

        let payload = serde_json::to_vec(&form)?;
        let request_id = form.request_id.as_deref().unwrap_or_default();

        match client.request(subject.to_string(), payload.into()).await {
            Ok(reply) => {
                let response: serde_json::Value = serde_json::from_slice(&reply.payload)?;
                info!(
                    request_id = %request_id,
                    status = %response["status"],
                    price = %response["formatted_price"],
                    "Received estimate"
                );
            }
            Err(e) => warn!(request_id = %request_id, error = %e, "Request failed"),
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!("Completed! Sent {} requests", count);

    Ok(())
}

async fn run_dry_mode(count: u64, invalid_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = FormGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let form = if rng.gen_bool(invalid_rate) {
            generator.generate_invalid()
        } else {
            generator.generate_valid()
        };

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, serde_json::to_string_pretty(&form)?);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
