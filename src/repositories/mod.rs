//! Repositorios de acceso a datos
//!
//! Este módulo contiene el acceso a PostgreSQL por entidad, con las
//! queries filtradas por rol donde corresponde.

pub mod appointment_repository;
pub mod invoice_repository;
pub mod repair_update_repository;
pub mod user_repository;
