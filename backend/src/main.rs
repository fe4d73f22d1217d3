//! Gateway entry-point: loads settings, wires the upstream source behind the
//! cache, and serves the REST endpoint with OpenAPI docs.

mod server;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gateway::config::GatewaySettings;
use gateway::domain::ports::{Cache, CacheKeyPrefixes, NoOpCache, UserPostsSource};
use gateway::domain::{CachedUpstreamValue, CachedUserPostsSource};
use gateway::outbound::cache::InMemoryCache;
use gateway::outbound::upstream::HttpUserPostsSource;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = GatewaySettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;

    let host: IpAddr = settings.server_host().parse().map_err(|e| {
        std::io::Error::other(format!(
            "invalid server host {:?}: {e}",
            settings.server_host()
        ))
    })?;
    let bind_addr = SocketAddr::new(host, settings.server_port());

    let user_posts = build_user_posts_source(&settings)?;
    let server = create_server(ServerConfig::new(bind_addr, user_posts))?;
    server.await
}

/// Build the upstream source, decorated with the configured cache.
fn build_user_posts_source(
    settings: &GatewaySettings,
) -> std::io::Result<Arc<dyn UserPostsSource>> {
    let base_url = settings
        .upstream_base_url()
        .map_err(std::io::Error::other)?;
    let direct = HttpUserPostsSource::new(base_url).map_err(std::io::Error::other)?;

    let cache: Arc<dyn Cache<CachedUpstreamValue>> = if settings.cache_enabled() {
        let cache = Arc::new(InMemoryCache::<CachedUpstreamValue>::new(settings.cache_ttl()));
        // Detached; the task ends with the process.
        let _sweeper = cache.spawn_sweeper(settings.cache_sweep_interval());
        info!(
            ttl_secs = settings.cache_ttl().as_secs(),
            sweep_secs = settings.cache_sweep_interval().as_secs(),
            "in-memory cache enabled"
        );
        cache
    } else {
        info!("cache disabled");
        Arc::new(NoOpCache)
    };

    Ok(Arc::new(CachedUserPostsSource::new(
        Arc::new(direct),
        cache,
        CacheKeyPrefixes::default(),
    )))
}
