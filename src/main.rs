//src/main.rs

use stockroom::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logger: RUST_LOG manda; sem ele, nível info.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let app_state = AppState::new(config).await?;

    let session = app_state.auth_service.state().await;
    match &session.user {
        Some(user) => tracing::info!("🔐 Sessão ativa: {} ({:?})", user.name, user.role),
        None => tracing::info!("🔓 Nenhuma sessão ativa"),
    }

    let summary = app_state.dashboard_service.get_summary().await;
    tracing::info!(
        products = summary.active_products,
        low_stock = summary.low_stock_products,
        clients = summary.active_clients,
        orders = summary.total_orders,
        revenue = %summary.total_revenue,
        "📊 Resumo do estoque"
    );

    for entry in app_state.dashboard_service.get_top_products().await {
        tracing::info!("🏆 {}: {} em estoque (valor {})", entry.name, entry.stock, entry.value);
    }

    Ok(())
}
