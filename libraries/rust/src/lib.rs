//! Welcome to pricedesk!

/// Authoritative symbol price store
pub mod store;

/// Short-TTL read cache
pub mod cache;

/// Price query and update service
pub mod service;
