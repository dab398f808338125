// Domain layer: typed manifest values and the source seam.

pub mod model;
pub mod ports;
