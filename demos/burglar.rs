//! # Example: burglar
//!
//! The house story: in the morning a window is opened, then the owner leaves
//! and locks up (windows close, alarm arms). A burglar rings, waits at most
//! 5 seconds, decides inside a completion callback, and breaks in through a
//! window, which trips the alarm.
//!
//! A second, unlocked house shows the other branch: the owner answers and the
//! burglar moves on.
//!
//! ## Run
//! ```bash
//! RUST_LOG=info cargo run --example burglar
//! ```

use rendezvous::{Burglar, GroupError, House, HouseConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), GroupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    println!("=== my house ===");
    let my_house = House::new("my-house", HouseConfig::default());
    my_house.open_window().await;
    my_house.lock(true).await;

    let burglar = Burglar::for_house(&my_house);
    let visit = burglar.visit(&my_house).await?;
    println!("[my-house] {visit:?} alerts={}", my_house.alerts());

    println!("=== burglar routine ===");
    let some_house = House::new("some-house", HouseConfig::default());
    let visit = burglar.visit(&some_house).await?;
    println!("[some-house] {visit:?}");

    Ok(())
}
