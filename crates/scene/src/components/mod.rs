pub mod interaction;
pub mod material;
pub mod mesh;

pub use interaction::*;
pub use material::*;
pub use mesh::*;
