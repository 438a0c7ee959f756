use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use garage_service::config::environment::EnvironmentConfig;
use garage_service::database;
use garage_service::routes::create_api_router;
use garage_service::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🔧 Garage Service - Citas, reparaciones y facturación");
    info!("=====================================================");

    let config = EnvironmentConfig::from_env();

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => {
            info!("✅ PostgreSQL conectado exitosamente");
            pool
        }
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Crear router de la API
    let app_state = AppState::new(pool, config.clone());
    let app = create_api_router(app_state);

    // Puerto del servidor
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /api/health - Health check");
    info!("🔑 Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("   GET  /api/auth/me - Usuario actual");
    info!("📅 Appointments:");
    info!("   GET  /api/appointments - Listar citas (según rol)");
    info!("   POST /api/appointments - Crear cita");
    info!("   GET  /api/appointments/:id - Obtener cita");
    info!("   PUT  /api/appointments/:id - Actualizar cita");
    info!("   DELETE /api/appointments/:id - Eliminar cita");
    info!("   PUT  /api/appointments/:id/assign - Asignar mecánico");
    info!("🔧 Repair updates:");
    info!("   GET  /api/repair-updates/appointment/:id - Avances de una cita");
    info!("   POST /api/repair-updates - Registrar avance");
    info!("   DELETE /api/repair-updates/:id - Borrar avance");
    info!("💰 Invoices:");
    info!("   GET  /api/invoices - Listar facturas (según rol)");
    info!("   POST /api/invoices - Crear factura");
    info!("   GET  /api/invoices/:id - Obtener factura");
    info!("   PUT  /api/invoices/:id - Actualizar factura");
    info!("   POST /api/invoices/:id/payment-intent - Crear payment intent");
    info!("   POST /api/invoices/confirm-payment - Confirmación del gateway");
    info!("🔌 Notificaciones:");
    info!("   GET  /ws - Canal WebSocket (handshake de auth en el canal)");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
