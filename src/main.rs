use std::sync::Arc;

use anyhow::Context;

use liftpro::store::durable::DurableStore;
use liftpro::store::lease::EngineLease;
use liftpro::store::CarStore;
use liftpro::{config, console, engine, fleet, init, monitor, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = init::parse_args();

    print::info("Starting liftpro...".to_string());

    /* START ----------- State stores and cold start ---------------------- */
    let store = Arc::new(CarStore::new());
    let durable = Arc::new(DurableStore::new(&options.roster_path));
    init::seed_fleet(&store, &durable)
        .await
        .with_context(|| format!("failed to load the roster from {}", options.roster_path))?;
    /* END ------------- State stores and cold start ---------------------- */

    /* START ----------- Engine lease and movement engine ----------------- */
    let holder = format!("liftpro-{}", std::process::id());
    let lease = Arc::new(
        EngineLease::acquire(&options.lease_path, &holder).with_context(|| {
            format!(
                "another engine may be running (lease at {})",
                options.lease_path
            )
        })?,
    );

    let fleet_watch_rx = engine::start(store.clone(), durable.clone(), lease.clone())
        .await
        .context("failed to start the movement engine")?;
    /* END ------------- Engine lease and movement engine ----------------- */

    /* START ----------- Monitor feed -------------------------------------- */
    if options.monitor_on {
        let rx = fleet_watch_rx.clone();
        let _monitor_task = tokio::spawn(async move {
            print::info("Starting monitor feed".to_string());
            if let Err(e) = monitor::start(rx).await {
                print::err(format!("Monitor feed stopped: {}", e));
            }
        });
    }
    /* END ------------- Monitor feed -------------------------------------- */

    /* START ----------- Fleet status printer ------------------------------ */
    {
        let rx = fleet_watch_rx.clone();
        let _print_task = tokio::spawn(async move {
            let mut fleet_snapshot = fleet::get_fleet(rx.clone());
            loop {
                if fleet::update_fleet(rx.clone(), &mut fleet_snapshot).await {
                    print::fleet(&fleet_snapshot);
                }
                tokio::time::sleep(config::STATUS_PRINT_PERIOD).await;
            }
        });
    }
    /* END ------------- Fleet status printer ------------------------------ */

    // The console owns the foreground; everything else runs as tasks.
    console::run(store, durable).await;

    if let Err(e) = lease.release() {
        print::warn(format!("Failed to release the engine lease: {}", e));
    }
    Ok(())
}
