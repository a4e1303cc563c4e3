// Domain layer: models and ports. Only std/serde dependencies live here.

pub mod model;
pub mod ports;
