//! Request handlers, grouped the way the storefront URL map is.

/// Profile and registration endpoints
pub mod accounts;
/// Role-gated admin CRUD endpoints
pub mod admin;
/// Cart view and mutation endpoints
pub mod cart;
/// Storefront catalog endpoints
pub mod catalog;
/// Checkout and confirmation endpoints
pub mod checkout;
/// Order history and detail endpoints
pub mod orders;
