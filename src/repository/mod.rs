pub mod arc;
pub mod event;
pub mod world;

pub use arc::{ArcRepository, InMemoryArcRepository};
pub use event::{EventRepository, InMemoryEventRepository};
pub use world::{
    genesis_arc, genesis_events, seed_genesis, ImportReport, SeedReport, WorldFile, WorldState,
};
