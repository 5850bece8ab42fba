//! Core business logic - framework-agnostic storefront operations.
//!
//! Everything here takes a `DatabaseConnection` (or transaction) and returns
//! `Result`; the web layer is a thin shell over these functions.

/// User creation, profile provisioning and role-group sync
pub mod accounts;
/// Admin permission rules and per-role form views
pub mod admin;
/// Cart operations: add, update, remove, totals
pub mod cart;
/// Catalog queries and admin CRUD over reference data
pub mod catalog;
/// The order engine: transactional checkout
pub mod checkout;
/// Order queries and admin status updates
pub mod orders;
