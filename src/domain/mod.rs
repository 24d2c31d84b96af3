// Domain layer: core models and ports (interfaces). No dependency on the parser or file formats.

pub mod model;
pub mod ports;
