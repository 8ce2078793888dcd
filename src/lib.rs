//! Wafrah - jewelry storefront product service
//!
//! This library provides the core functionality for the Wafrah storefront:
//! product persistence, the HTTP API handlers, the admin gateway client, and
//! the mock-data fallback used in development and demos.

pub mod admin;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod gateway;
pub mod handlers;
pub mod images;
pub mod middleware;
pub mod mock;
pub mod models;
pub mod store;
