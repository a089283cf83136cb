//! HTTP backend speaking the `/stocks` JSON contract.

pub mod provider;
pub mod response;

pub use provider::HttpStockProvider;
