// Adapters layer: concrete implementations of the domain ports (http backend, in-memory store).

pub mod http;
pub mod memory;
