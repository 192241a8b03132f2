pub mod extrude;
pub mod regions;
pub mod shape;
pub mod symbology;

pub use regions::*;
