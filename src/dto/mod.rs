//! DTOs de la API
//!
//! Requests con validación declarativa y responses por recurso. El wire usa
//! camelCase, que es lo que consume el cliente web.

pub mod appointment_dto;
pub mod auth_dto;
pub mod invoice_dto;
pub mod repair_update_dto;

use serde::Serialize;

/// Response genérica de la API
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            count: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            count: None,
            data: Some(data),
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Response de listado con el campo `count` que espera el cliente
    pub fn list(items: Vec<T>) -> Self {
        Self {
            success: true,
            message: None,
            count: Some(items.len()),
            data: Some(items),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_carries_count() {
        let response = ApiResponse::list(vec![1, 2, 3]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["count"], 3);
        assert_eq!(value["data"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_success_response_omits_empty_fields() {
        let response = ApiResponse::success("ok");
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("message").is_none());
        assert!(value.get("count").is_none());
    }
}
