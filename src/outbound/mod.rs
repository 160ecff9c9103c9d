//! Outbound adapters: implementations of the driven ports.

pub mod persistence;
