//! Test Scoring Request Producer
//!
//! Generates and publishes sample scoring requests to NATS for pipeline testing.

use rand::seq::SliceRandom;
use rand::Rng;
use sms_credit_pipeline::types::{decision::ScoringRequest, message::Message};
use std::time::Duration;
use tracing::{info, warn};

const STABLE_TEMPLATES: &[(&str, &str)] = &[
    ("Bancolombia le informa: Pago de nomina por $2.350.000 recibido", "891333"),
    ("Nequi: recibiste una consignacion de 150.000 pesos", "85954"),
    ("Pago exitoso de tu factura EPM. Gracias por tu pago", "EPM"),
    ("Tu codigo de verificacion Davivienda es 482913", "85327"),
    ("Compra aprobada con tu tarjeta Visa por $89.900 en Exito", "891333"),
    ("Porvenir: tus cesantias fueron consignadas", "PORVENIR"),
    ("Felicitaciones! Tienes un cupo disponible preaprobado", "BANCOLOMBIA"),
    ("Movistar: tu plan pospago fue renovado", "MOVISTAR"),
];

const RISKY_TEMPLATES: &[(&str, &str)] = &[
    ("Su obligacion esta en mora. Evite cobro juridico", "3124567890"),
    ("Saldo insuficiente para realizar la transaccion", "891333"),
    ("Solicitud de credito rechazado", "RAPICREDIT"),
    ("Prestame 50 mil que es una emergencia", "+57 301 555 1234"),
    ("Casa de empeño: su prenda vence manana", "3009876543"),
    ("Gana con Betplay! apuesta hoy", "wa.me/573001112233"),
    ("Recarga prepago de $5.000 exitosa", "TIGO"),
    ("Vacante disponible, envia tu hoja de vida", "empleos@ofertas.co"),
];

/// Scoring request generator for testing
struct RequestGenerator {
    rng: rand::rngs::ThreadRng,
    request_counter: u64,
}

impl RequestGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            request_counter: 0,
        }
    }

    /// Generate a request whose log is mostly stable-income messages
    fn generate_stable(&mut self) -> ScoringRequest {
        self.generate(0.1)
    }

    /// Generate a request whose log is mostly distress messages
    fn generate_risky(&mut self) -> ScoringRequest {
        self.generate(0.7)
    }

    fn generate(&mut self, risky_share: f64) -> ScoringRequest {
        self.request_counter += 1;
        let message_count = self.rng.gen_range(0..60);

        let messages = (0..message_count)
            .filter_map(|_| {
                let templates = if self.rng.gen_bool(risky_share) {
                    RISKY_TEMPLATES
                } else {
                    STABLE_TEMPLATES
                };
                templates
                    .choose(&mut self.rng)
                    .map(|&(body, address)| Message::new(body, address))
            })
            .collect();

        let mut request = ScoringRequest::new(
            format!("credit_{:08}", self.request_counter),
            format!("user_{:08x}", self.rng.gen::<u32>()),
        )
        .with_messages(messages);
        request.devices = vec![format!("device_{:016x}", self.rng.gen::<u64>())];
        request
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("test_producer=info".parse()?),
        )
        .init();

    info!("Starting Test Scoring Request Producer");

    let args: Vec<String> = std::env::args().collect();
    let nats_url = args.get(1).map(|s| s.as_str()).unwrap_or("nats://localhost:4222");
    let subject = args
        .get(2)
        .map(|s| s.as_str())
        .unwrap_or("credit.scoring.requests");
    let count: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);
    let risky_rate: f64 = args.get(4).and_then(|s| s.parse().ok()).unwrap_or(0.3);
    let delay_ms: u64 = args.get(5).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(
        nats_url = %nats_url,
        subject = %subject,
        count = count,
        risky_rate = risky_rate,
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
            return run_dry_mode(count, risky_rate, delay_ms).await;
        }
    };

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    let mut stable_count = 0;
    let mut risky_count = 0;

    for i in 0..count {
        let request = if rng.gen_bool(risky_rate) {
            risky_count += 1;
            generator.generate_risky()
        } else {
            stable_count += 1;
            generator.generate_stable()
        };

        let payload = serde_json::to_vec(&request)?;
        client.publish(subject.to_string(), payload.into()).await?;

        if (i + 1) % 10 == 0 {
            info!(
                "Published {}/{} requests ({} stable, {} risky)",
                i + 1,
                count,
                stable_count,
                risky_count
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    client.flush().await?;

    info!(
        "Completed! Published {} requests ({} stable, {} risky)",
        count, stable_count, risky_count
    );

    Ok(())
}

async fn run_dry_mode(count: u64, risky_rate: f64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no NATS connection)");

    let mut generator = RequestGenerator::new();
    let mut rng = rand::thread_rng();

    for i in 0..count {
        let request = if rng.gen_bool(risky_rate) {
            generator.generate_risky()
        } else {
            generator.generate_stable()
        };

        let json = serde_json::to_string_pretty(&request)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample request {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
