// Domain layer: models, ports and the error-message contract. No transport code here.

pub mod feedback;
pub mod model;
pub mod ports;
