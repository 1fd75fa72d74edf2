pub mod biome;
pub mod config;
pub mod diagram;
pub mod land_shape;

pub use biome::BiomeType;
pub use config::{LandShapeType, MapGenerationParams, ShapeSettings};
pub use diagram::{Corner, DiagramError, Edge, Site, TilesDiagram};
pub use land_shape::{LandShape, RadialShape};
