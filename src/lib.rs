mod batch;
pub mod binary_io;
mod characters;
mod loader;
mod map;
pub mod tiled_load;

pub use batch::*;
pub use characters::*;
pub use loader::*;
pub use map::*;
