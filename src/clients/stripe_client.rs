//! Cliente HTTP del gateway de pagos (Stripe)
//!
//! El resto del sistema habla con el gateway a través del trait
//! `PaymentGateway`; este módulo contiene la implementación real contra la
//! API de Stripe. Los montos viajan en unidades menores (centavos).

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

/// Intent de pago devuelto por el gateway
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Seam hacia el gateway de pagos externo
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Crea un payment intent por `amount_minor_units` en la moneda dada.
    /// `metadata` viaja al gateway para reconciliación (id y número de factura).
    async fn create_payment_intent(
        &self,
        amount_minor_units: i64,
        currency: &str,
        metadata: &[(&str, &str)],
    ) -> Result<PaymentIntent, AppError>;
}

/// Cliente de la API de Stripe
pub struct StripeClient {
    client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeClient {
    pub fn new(config: &EnvironmentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            secret_key: config.stripe_secret_key.clone(),
            base_url: config.stripe_api_url.clone(),
        }
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_payment_intent(
        &self,
        amount_minor_units: i64,
        currency: &str,
        metadata: &[(&str, &str)],
    ) -> Result<PaymentIntent, AppError> {
        let amount = amount_minor_units.to_string();
        let mut params: Vec<(String, &str)> = vec![
            ("amount".to_string(), amount.as_str()),
            ("currency".to_string(), currency),
        ];
        for (key, value) in metadata {
            params.push((format!("metadata[{}]", key), value));
        }

        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Stripe request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Stripe returned {}: {}",
                status, body
            )));
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::ExternalApi(format!("Invalid Stripe response: {}", e)))
    }
}

/// Convierte un monto en moneda mayor a unidades menores del gateway
pub fn to_minor_units(amount: Decimal) -> Result<i64, AppError> {
    (amount * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| AppError::Internal(format!("Amount out of range: {}", amount)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(Decimal::from_str("55.00").unwrap()).unwrap(), 5500);
        assert_eq!(to_minor_units(Decimal::from_str("0.99").unwrap()).unwrap(), 99);
        assert_eq!(to_minor_units(Decimal::ZERO).unwrap(), 0);
    }

    #[test]
    fn test_to_minor_units_rounds_sub_cent_amounts() {
        assert_eq!(to_minor_units(Decimal::from_str("10.005").unwrap()).unwrap(), 1000);
        assert_eq!(to_minor_units(Decimal::from_str("10.015").unwrap()).unwrap(), 1002);
    }
}
