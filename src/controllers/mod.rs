//! Controllers del sistema
//!
//! Este módulo contiene la lógica de cada operación: chequeos de
//! autorización, validación agregada, transiciones de estado y emisión de
//! notificaciones.

pub mod appointment_controller;
pub mod auth_controller;
pub mod invoice_controller;
pub mod repair_update_controller;
