pub mod ids;
pub mod material;
pub mod model;
pub mod properties;
pub mod sensor;
pub mod surface;
pub mod volume;
