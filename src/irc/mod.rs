//! IRC protocol layer: line codec, input parsing and the TLS transport.

pub mod codec;
pub mod commands;
pub mod connection;
pub mod transport;
