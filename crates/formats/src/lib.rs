pub mod geojson;
pub mod roster;

pub use geojson::*;
pub use roster::*;
