//! Storefront - order management service
//!
//! CRUD over products, orders and order items backed by SQLite, with a
//! stock-reserving order placement workflow and an axum REST surface.

pub mod api;
pub mod config;
pub mod dto;
pub mod mapping;
pub mod model;
pub mod services;
pub mod storage;
pub mod utils;
pub mod validation;
