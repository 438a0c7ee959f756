//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for communicating with external APIs.

pub mod stripe_client;

pub use stripe_client::{PaymentGateway, PaymentIntent, StripeClient};
