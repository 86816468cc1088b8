//! Credit Decision Pipeline - Main Entry Point
//!
//! Consumes scoring requests from NATS, extracts SMS features, runs the
//! classifier and publishes credit decisions.

use anyhow::Result;
use futures::StreamExt;
use sms_credit_pipeline::{
    config::{AppConfig, LoggingConfig},
    consumer::RequestConsumer,
    metrics::{MetricsReporter, PipelineMetrics},
    models::{Classifier, InferenceEngine},
    producer::DecisionProducer,
    scorer::{CreditScorer, DEFAULT_THRESHOLD},
    types::decision::{ScoringFailure, ScoringRequest},
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!("sms_credit_pipeline={}", logging.level))
    })?;

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_logging(&config.logging)?;

    info!("Starting Credit Decision Pipeline");
    info!(
        threshold = DEFAULT_THRESHOLD,
        workers = config.pipeline.workers,
        "Configuration loaded"
    );

    let metrics = Arc::new(PipelineMetrics::new());

    // A missing model does not stop the service; requests fail explicitly instead.
    let feature_count = sms_credit_pipeline::features::SELECTED_FEATURES.len();
    let classifier: Option<Arc<dyn Classifier>> =
        match InferenceEngine::new(&config.model, feature_count) {
            Ok(engine) => {
                info!(model = %engine.name(), features = feature_count, "Classifier loaded");
                Some(Arc::new(engine))
            }
            Err(e) => {
                error!(error = %e, "Failed to load classifier, every request will fail until restart");
                None
            }
        };

    let scorer = Arc::new(CreditScorer::new(classifier));

    let client = async_nats::connect(&config.nats.url).await?;
    info!("Connected to NATS at {}", config.nats.url);

    let consumer = RequestConsumer::new(client.clone(), &config.nats.request_subject);
    let producer = Arc::new(DecisionProducer::new(
        client.clone(),
        &config.nats.decision_subject,
    ));

    info!(
        "Listening on {} with {} parallel workers, publishing to {}",
        consumer.subject(),
        config.pipeline.workers,
        producer.subject()
    );

    let semaphore = Arc::new(Semaphore::new(config.pipeline.workers.max(1)));
    let processed_count = Arc::new(AtomicU64::new(0));

    let metrics_clone = metrics.clone();
    let report_interval = config.pipeline.report_interval_secs;
    tokio::spawn(async move {
        let reporter = MetricsReporter::new(metrics_clone, report_interval);
        reporter.start().await;
    });

    let mut subscription = consumer.subscribe().await?;

    while let Some(message) = subscription.next().await {
        let permit = semaphore.clone().acquire_owned().await?;

        let scorer = scorer.clone();
        let producer = producer.clone();
        let metrics = metrics.clone();
        let processed_count = processed_count.clone();

        tokio::spawn(async move {
            let start_time = Instant::now();

            let request = match serde_json::from_slice::<ScoringRequest>(&message.payload) {
                Ok(request) => request,
                Err(e) => {
                    warn!(error = %e, "Failed to deserialize scoring request");
                    metrics.record_failure();
                    if let Some(reply) = message.reply.clone() {
                        let failure = ScoringFailure::malformed(&message.payload, &e);
                        if let Err(e) = producer.reply_failure(reply, &failure).await {
                            error!(credit_uid = %failure.credit_uid, error = %e, "Failed to reply with failure");
                        }
                    }
                    drop(permit);
                    return;
                }
            };

            let credit_uid = request.credit_uid.clone();

            match scorer.score_request(&request) {
                Ok(payload) => {
                    let processing_time = start_time.elapsed();
                    metrics.record_decision(
                        processing_time,
                        payload.fraud_probability,
                        payload.decision,
                    );
                    metrics.record_defaulted(payload.features_used.defaulted());

                    if let Err(e) = producer.publish(&payload).await {
                        error!(credit_uid = %credit_uid, error = %e, "Failed to publish decision");
                    }
                    if let Some(reply) = message.reply.clone() {
                        if let Err(e) = producer.reply(reply, &payload).await {
                            error!(credit_uid = %credit_uid, error = %e, "Failed to reply with decision");
                        }
                    }

                    info!(
                        credit_uid = %credit_uid,
                        user_id = %request.user_id,
                        sms_count = request.messages.len(),
                        probability = payload.fraud_probability,
                        decision = payload.decision.as_str(),
                        processing_time_us = processing_time.as_micros(),
                        "Credit decision published"
                    );
                }
                Err(e) => {
                    metrics.record_failure();
                    error!(credit_uid = %credit_uid, error = %e, "Scoring failed");

                    if let Some(reply) = message.reply.clone() {
                        let failure = ScoringFailure {
                            credit_uid: credit_uid.clone(),
                            error: e.to_string(),
                        };
                        if let Err(e) = producer.reply_failure(reply, &failure).await {
                            error!(credit_uid = %credit_uid, error = %e, "Failed to reply with failure");
                        }
                    }
                }
            }

            let count = processed_count.fetch_add(1, Ordering::Relaxed) + 1;
            if count % 100 == 0 {
                let processing_stats = metrics.get_processing_stats();
                info!(
                    processed = count,
                    throughput = format!("{:.1} req/s", metrics.get_throughput()),
                    avg_latency_us = processing_stats.mean_us,
                    "Processing milestone"
                );
            } else {
                debug!(processed = count, "Request handled");
            }

            drop(permit);
        });
    }

    info!("Pipeline shutting down...");
    metrics.print_summary();

    Ok(())
}
