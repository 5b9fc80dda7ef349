pub mod config;
pub mod events;
pub mod generator;
pub mod heightmap;
pub mod lakes;
pub mod rivers;

pub use config::{GenerationParams, LakeSettings, RidgeSettings, TerrainSettings};
pub use events::{EventSink, GenerationEvent, NullSink, RejectReason};
pub use generator::{WorldOutput, generate_world};
pub use heightmap::{Heightmap, generate_heightmap};
pub use lakes::{Lake, LakeResult, Spillway, generate_lakes};
pub use rivers::RiverMask;
