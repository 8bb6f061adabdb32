// Domain layer: booking and usage models plus the ports the adapters implement.

pub mod model;
pub mod ports;
