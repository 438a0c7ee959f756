//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que no cubren los derives de `validator`.

use chrono::{DateTime, NaiveTime, Utc};
use serde::Serialize;
use validator::ValidationError;

/// Validar que un valor esté en una lista de valores permitidos
pub fn validate_enum<T: PartialEq + std::fmt::Display + std::fmt::Debug + Serialize>(
    value: T,
    allowed_values: &[T],
) -> Result<(), ValidationError> {
    if !allowed_values.contains(&value) {
        let mut error = ValidationError::new("enum");
        error.add_param("value".into(), &value);
        error.add_param("allowed_values".into(), &format!("{:?}", allowed_values));
        return Err(error);
    }
    Ok(())
}

/// Validar que una fecha esté en el futuro
pub fn validate_future_date(value: DateTime<Utc>) -> Result<(), ValidationError> {
    if value <= Utc::now() {
        let mut error = ValidationError::new("future_date");
        error.add_param("value".into(), &value.to_rfc3339());
        return Err(error);
    }
    Ok(())
}

/// Validar y convertir string a hora en formato HH:MM
pub fn validate_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|_| {
        let mut error = ValidationError::new("time");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"HH:MM".to_string());
        error
    })
}

/// Validar longitud mínima y máxima
pub fn validate_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len < min || len > max {
        let mut error = ValidationError::new("length");
        error.add_param("min".into(), &min);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &len);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_enum() {
        let allowed = vec!["pending", "paid"];
        assert!(validate_enum("pending", &allowed).is_ok());
        assert!(validate_enum("refunded", &allowed).is_err());
    }

    #[test]
    fn test_validate_future_date() {
        assert!(validate_future_date(Utc::now() + Duration::days(1)).is_ok());
        assert!(validate_future_date(Utc::now() - Duration::days(1)).is_err());
    }

    #[test]
    fn test_validate_time() {
        assert!(validate_time("09:30").is_ok());
        assert!(validate_time("23:59").is_ok());
        assert!(validate_time("9:30 AM").is_err());
        assert!(validate_time("25:00").is_err());
    }

    #[test]
    fn test_validate_length() {
        let value = "test";
        assert!(validate_length(value, 1, 10).is_ok());
        assert!(validate_length(value, 5, 10).is_err());
        assert!(validate_length(value, 1, 3).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_non_negative() {
        assert!(validate_non_negative(5).is_ok());
        assert!(validate_non_negative(0).is_ok());
        assert!(validate_non_negative(-5).is_err());
    }
}
