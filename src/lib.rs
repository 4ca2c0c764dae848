pub mod config;
pub mod controls;
pub mod data_loader;
pub mod engine;
pub mod io;
pub mod processor;
pub mod render;
pub mod scripted;
pub mod snapshot;
pub mod types;
pub mod visualization;

pub use config::StabilizationConfig;
pub use controls::SharedControls;
pub use engine::{PointTrackAccess, StitchingEngine};
pub use processor::{FrameOutcome, MosaicProcessor, SessionStats};
pub use snapshot::{MosaicSnapshot, SnapshotSlot};
