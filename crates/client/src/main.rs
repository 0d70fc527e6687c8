use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use domain::models::Sighting;
use tracing::{info, warn};

use probe_dash_client::config::Config;
use probe_dash_client::logging::init_logging;
use probe_dash_client::{DashboardSync, LiveFeedPoller, SnifferClient};
use shared::time::{format_compact_time, format_local_time};
use state::DashboardState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    init_logging(&config.logging)?;

    info!("Starting probe dashboard v{}", env!("CARGO_PKG_VERSION"));

    let tz = config.display.tz()?;
    let client = SnifferClient::new(&config.backend)?;
    info!(backend = %client.base_url(), "Using sniffer backend");

    let health = client.health().await?;
    if !health.is_healthy() {
        warn!(status = %health.status, "Backend reports degraded health");
    }

    let state = DashboardState::new();
    state.devices.device_filter.set(config.display.filter()?);
    let sync = DashboardSync::new(client.clone(), state.clone());

    let stats = client.get_overview_stats().await?;
    println!(
        "{} devices ({} trusted, {} unknown), {} new today, {} new this week",
        stats.total_devices,
        stats.trusted_count,
        stats.unknown_count,
        stats.new_today,
        stats.new_this_week
    );
    if let Some(top) = &stats.most_active_today {
        println!(
            "Most active today: {} ({} sightings)",
            top.name.as_deref().unwrap_or(&top.mac),
            top.sightings
        );
    }

    let devices = sync.refresh_devices().await?;
    println!("\n{} devices ({}):", devices.len(), state.devices.device_filter.get());
    for device in &devices {
        println!(
            "  {:<17}  {:<28}  last seen {}",
            device.mac,
            device.display_name(),
            format_local_time(&device.last_seen, tz)
        );
    }

    if let Err(e) = sync.refresh_trusted_macs().await {
        warn!(error = %e, "Could not load trusted devices; live feed shows everything");
    }

    let live = state.live.clone();
    let _printer = state.live.live_probes.subscribe(move |probes: &Vec<Sighting>| {
        if let Some(latest) = probes.first().filter(|p| !live.is_hidden(p)) {
            println!(
                "[{}] {} {} dBm {}",
                format_compact_time(&latest.timestamp, tz),
                latest.mac,
                latest.dbm,
                latest.ssid.as_deref().unwrap_or("<broadcast>")
            );
        }
    });

    println!("\nLive probes (Ctrl-C to stop):");
    let poller = LiveFeedPoller::new(Arc::new(client), state.live.clone(), config.live_feed);
    let handle = poller.spawn();

    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received");
    handle.wait_for_shutdown(Duration::from_secs(5)).await;

    Ok(())
}
