// Domain layer: sales records, analysis results and ports (interfaces).

pub mod model;
pub mod ports;
