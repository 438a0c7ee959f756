//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod appointment;
pub mod auth;
pub mod invoice;
pub mod repair_update;
pub mod user;
