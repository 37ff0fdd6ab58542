use super::signals::ServiceSignal;
use crate::bootstrap::init_database;
use crate::di::{FilterServices, Repositories};
use ferrous_shield_application::ports::{TunnelDevice, BLOCKED_COUNT_KEY};
use ferrous_shield_domain::{Config, ServiceStats, TunnelConfig};
use ferrous_shield_infrastructure::forwarding::{ResponseWriter, UpstreamForwarder};
use ferrous_shield_infrastructure::tunnel::{PacketDispatcher, ServiceContext, TunnelLoop};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{error, info, warn};

/// Runs the filter until a stop signal arrives or the tunnel fails.
pub async fn run(config: &Config) -> anyhow::Result<()> {
    let device = open_tunnel(&config.tunnel)?;

    let repos = Repositories::new(init_database(&config.database).await?);
    let filter = FilterServices::new(&repos, &config.blocking);
    let ctx = Arc::new(ServiceContext::new());

    match repos.service_state.get(BLOCKED_COUNT_KEY).await {
        Ok(Some(value)) => match value.parse::<u64>() {
            Ok(total) => ctx.restore_blocked(total),
            Err(e) => warn!(error = %e, value = %value, "Ignoring unreadable blocked count"),
        },
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to restore blocked count"),
    }

    if let Err(e) = filter.lifecycle.start().await {
        warn!(error = %e, "Bloom filter unavailable, every query goes to the store");
    }

    let forwarder = Arc::new(UpstreamForwarder::new(&config.upstream));
    forwarder.check_exemption()?;
    let writer = Arc::new(ResponseWriter::new(Arc::clone(&device)));
    let mut dispatcher = PacketDispatcher::new(
        Arc::clone(&filter.engine),
        forwarder,
        writer,
        Arc::clone(&ctx),
        Handle::current(),
    );
    if config.database.log_queries {
        dispatcher = dispatcher.with_query_log(Arc::clone(&repos.query_log));
    }

    let mut sigterm = ServiceSignal::terminate()?;
    let mut sighup = ServiceSignal::hangup()?;
    let tunnel_loop = TunnelLoop::new(
        device,
        dispatcher,
        Arc::clone(&ctx),
        config.tunnel.read_buffer_size,
    );
    let handle = tunnel_loop.spawn()?;
    let joined = tokio::task::spawn_blocking(move || handle.join());
    tokio::pin!(joined);

    info!(
        tunnel = %config.tunnel.name,
        upstream = %config.upstream.address,
        "DNS filter running"
    );

    let outcome = loop {
        tokio::select! {
            result = &mut joined => break result,
            _ = tokio::signal::ctrl_c() => {
                info!("Received SIGINT, shutting down");
                ctx.stop();
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
                ctx.stop();
            }
            _ = sighup.recv() => {
                info!("Received SIGHUP, reloading filter");
                let reloader = filter.reloader();
                tokio::spawn(async move {
                    if let Err(e) = reloader.reload().await {
                        error!(error = %e, "Filter reload failed");
                    }
                });
            }
        }
    };

    ctx.stop();
    let stats = ctx.stats();
    if let Err(e) = repos
        .service_state
        .set(BLOCKED_COUNT_KEY, &stats.blocked.to_string())
        .await
    {
        warn!(error = %e, "Failed to persist blocked count");
    }
    log_shutdown_stats(&stats);

    match outcome {
        Ok(Ok(result)) => Ok(result?),
        Ok(Err(_)) => Err(anyhow::anyhow!("tunnel loop panicked")),
        Err(e) => Err(e.into()),
    }
}

#[cfg(target_os = "linux")]
fn open_tunnel(config: &TunnelConfig) -> anyhow::Result<Arc<dyn TunnelDevice>> {
    use ferrous_shield_infrastructure::tunnel::LinuxTun;

    let tun = LinuxTun::open(&config.name, config.poll_interval())?;
    info!(name = tun.name(), "Tunnel device opened");
    Ok(Arc::new(tun))
}

#[cfg(not(target_os = "linux"))]
fn open_tunnel(config: &TunnelConfig) -> anyhow::Result<Arc<dyn TunnelDevice>> {
    anyhow::bail!(
        "tunnel '{}': TUN devices are only supported on Linux",
        config.name
    )
}

fn log_shutdown_stats(stats: &ServiceStats) {
    info!(
        frames = stats.frames,
        dropped = stats.dropped,
        queries = stats.queries,
        blocked = stats.blocked,
        allowed = stats.allowed,
        forwarded = stats.forwarded,
        upstream_failures = stats.upstream_failures,
        "DNS filter stopped"
    );
}
