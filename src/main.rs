use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use sheets_gateway::{
    AppState,
    cache::store::store_from_config,
    config::Config,
    gateway::{CacheTtl, CachedGateway},
    router::create_router,
    sheets::GoogleSheetsClient,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    if config.sheets_api_key.is_none() {
        tracing::warn!("GOOGLE_SHEETS_API_KEY is not set, data endpoints will return 500");
    }

    // 存储不可用时限流放行、缓存失效，服务照常运行
    let store = store_from_config(&config.cache_backend);

    let source = Arc::new(GoogleSheetsClient::new(
        reqwest::Client::new(),
        &config.sheets_api_base,
        config.sheets_api_key.clone(),
    ));

    let gateway = Arc::new(CachedGateway::new(
        store.clone(),
        source,
        CacheTtl {
            populated: config.cache_ttl(),
            empty: config.empty_cache_ttl(),
        },
    ));

    let state = AppState {
        config: Arc::new(config),
        store,
        gateway,
    };

    let addr = SocketAddr::new(
        state.config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        state.config.server_port,
    );

    let app = create_router(state);

    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        app,
    )
    .await
    .expect("Failed to start server");
}
