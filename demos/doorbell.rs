//! # Example: doorbell
//!
//! One doorbell round against a house that is home and one that is locked.
//!
//! ## Flow
//! ```text
//! coordinator ──► group.enter()
//!             ──► house.ring_doorbell(reply)   (reply: answer + leave)
//!             ──► group.wait(5s)
//!                   ├─ Completed (owner answered)
//!                   └─ TimedOut  (locked house, nobody answers)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example doorbell
//! ```

use rendezvous::{ring_and_wait_default, House, HouseConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cfg = HouseConfig::default();

    // 1. Somebody is home
    let home = House::new("home", cfg.clone());
    let outcome = ring_and_wait_default(&home).await;
    println!("[home] status={} answered={}", outcome.status.as_label(), outcome.answered);

    // 2. Nobody is home: the wait runs into its timeout
    let away = House::new("away", cfg);
    away.lock(true).await;
    let outcome = ring_and_wait_default(&away).await;
    println!("[away] status={} answered={}", outcome.status.as_label(), outcome.answered);
}
