pub mod minimap;
pub mod palette;
pub mod scene;
pub mod sprites;
pub mod surface;
