//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use sqlx::PgPool;

use crate::clients::stripe_client::{PaymentGateway, StripeClient};
use crate::config::environment::EnvironmentConfig;
use crate::notifications::registry::NotificationRegistry;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub notifications: Arc<NotificationRegistry>,
    pub payments: Arc<dyn PaymentGateway>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let payments = Arc::new(StripeClient::new(&config));
        Self {
            pool,
            config,
            notifications: Arc::new(NotificationRegistry::new()),
            payments,
        }
    }

    /// Variante con un gateway inyectado, para tests y entornos sin Stripe
    pub fn with_payment_gateway(
        pool: PgPool,
        config: EnvironmentConfig,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            pool,
            config,
            notifications: Arc::new(NotificationRegistry::new()),
            payments,
        }
    }
}
