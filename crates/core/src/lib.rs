//! Brewline Core - Shared domain types and cart pricing.
//!
//! This crate provides the domain model used across all Brewline components:
//! - `storefront` - Customer, owner, and admin web consoles
//! - `cli` - Command-line tools for migrations and price quotes
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. Every price computation the storefront performs
//! lives here so it can be tested without a server.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, points, emails, and statuses
//! - [`catalog`] - Menu items, their options, stores, users, and coupons
//! - [`cart`] - Cart lines and the pricing rules for adding and updating them
//! - [`checkout`] - Point and coupon discounts, order placement

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod types;

pub use types::*;
