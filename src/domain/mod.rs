// Domain layer: HubSpot record models and the client ports the core depends on.

pub mod model;
pub mod ports;
