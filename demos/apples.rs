//! # Example: apples
//!
//! Several watchers keep an eye on an apple each and throw it away after a
//! while. A completion callback reports once every apple is gone. Group
//! events are logged through the built-in `LogWriter` subscriber.
//!
//! ## Flow
//! ```text
//! group.spawn(watch green) ─┐
//! group.spawn(watch blue)  ─┼──► pending = 3 ──► leave ×3 ──► callback
//! group.spawn(watch red)   ─┘
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example apples
//! ```

use std::sync::Arc;
use std::time::Duration;

use rendezvous::{Config, GroupError, LogWriter, RendezvousGroup, Subscribe, WaitStatus};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), GroupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let group = RendezvousGroup::builder(Config::labeled("apples"))
        .with_subscribers(subs)
        .build()?;

    for (name, ticks) in [("green", 4u64), ("blue", 3), ("red", 2)] {
        group.spawn(async move {
            for tick in 1..=ticks {
                println!("[{name}] still looking fine ({tick}/{ticks})");
                tokio::time::sleep(Duration::from_millis(250)).await;
            }
            println!("[{name}] thrown away");
        })?;
    }

    let (tx, rx) = oneshot::channel();
    group.notify(move || {
        println!("all apples have been thrown away");
        let _ = tx.send(());
    })?;

    match group.wait_default().await {
        WaitStatus::Completed => {
            let _ = rx.await;
        }
        WaitStatus::TimedOut => println!("still watching {} apples", group.pending()),
    }
    Ok(())
}
