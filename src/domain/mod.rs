// Domain layer: patch and probe models plus the ports the adapters implement.

pub mod model;
pub mod ports;
