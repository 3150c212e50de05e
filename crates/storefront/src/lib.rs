//! RocketShoes Storefront library.
//!
//! This crate provides the cart functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! - [`cart`] - The cart model, the [`cart::CartStore`] and user-facing notices
//! - [`catalog`] - Stock and product lookups against the catalog API
//! - [`storage`] - The key-value slot the cart is persisted to
//! - [`routes`] - HTTP access to the cart for UI components

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
