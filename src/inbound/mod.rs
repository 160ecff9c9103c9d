//! Inbound adapters: protocol surfaces driving the domain.

pub mod http;
