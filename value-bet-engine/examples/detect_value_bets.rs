//! Value bet detection runner.
//!
//! Reads a detection batch (predictions, nested market odds, bankroll) as JSON,
//! runs the engine, and prints the ranked value bets as display records.
//!
//! Usage:
//!   # Optional thresholds in .env or the environment
//!   VALUE_BET_MIN_VALUE=0.02
//!   VALUE_BET_MIN_CONFIDENCE=0.60
//!   VALUE_BET_KELLY_FRACTION=0.25
//!   VALUE_BET_MAX_STAKE=0.05
//!
//!   cargo run -p value-bet-engine --example detect_value_bets -- batch.json
//!
//! Without a file argument a built-in demo batch is used.

use value_bet_engine::{
    opportunity::total_stake, DetectionBatch, EngineConfig, ValueBetEngine, ValueBetRecord,
};
use chrono::Utc;
use tracing::{error, info};

const DEMO_BATCH: &str = r#"{
    "predictions": [
        {
            "match_id": "match_1",
            "match_name": "Juventus vs Inter",
            "probabilities": {"home": 0.52, "draw": 0.25, "away": 0.23},
            "confidence": 0.72
        },
        {
            "match_id": "match_2",
            "match_name": "Milan vs Roma",
            "probabilities": {"home": 0.41, "draw": 0.29, "away": 0.30},
            "confidence": 0.66
        },
        {
            "match_id": "match_3",
            "match_name": "Napoli vs Lazio",
            "probabilities": {"home": 0.58, "draw": 0.24, "away": 0.18},
            "confidence": 0.55
        }
    ],
    "market": {
        "match_1": {
            "pinnacle": {"home": 2.30, "draw": 3.50, "away": 3.90},
            "bet365": {"home": 2.25, "draw": 3.60, "away": 4.00}
        },
        "match_2": {
            "williamhill": {"home": 2.62, "draw": 3.30, "away": 3.10},
            "sisal": {"home": 2.55, "draw": 3.45, "away": 3.25}
        },
        "match_3": {
            "bet365": {"home": 1.95, "draw": 3.70, "away": 5.50}
        }
    },
    "bankroll": 1000
}"#;

fn main() {
    init_logging();
    dotenv();

    let config = EngineConfig::from_env();
    let engine = match ValueBetEngine::new(config) {
        Ok(engine) => engine,
        Err(e) => {
            error!(%e, "Invalid engine configuration");
            std::process::exit(1);
        }
    };

    let json = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                error!(%path, %e, "Failed to read batch file");
                std::process::exit(1);
            }
        },
        None => DEMO_BATCH.to_string(),
    };

    let batch = match DetectionBatch::from_json(&json) {
        Ok(batch) => batch,
        Err(e) => {
            error!(%e, "Rejected detection batch");
            std::process::exit(1);
        }
    };

    let (bets, stats) =
        engine.detect_with_stats(&batch.predictions, &batch.market, batch.bankroll, Utc::now());

    info!(
        value_bets = bets.len(),
        bankroll = %batch.bankroll,
        total_stake = %total_stake(&bets).round_dp(2),
        ?stats,
        "Detection finished"
    );

    let records: Vec<ValueBetRecord> = bets.iter().map(|bet| bet.to_record()).collect();
    match serde_json::to_string_pretty(&records) {
        Ok(output) => println!("{output}"),
        Err(e) => error!(%e, "Failed to serialise value bets"),
    }
}

fn dotenv() {
    for path in &[".env", "../.env"] {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            break;
        }
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(cfg!(debug_assertions))
        .init()
}
