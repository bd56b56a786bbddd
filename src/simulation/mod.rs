//! Frame pipeline: context, intents, execution policy and the tick itself

pub mod context;
pub mod intent;
pub mod policy;
pub mod tick;

pub use context::GameContext;
pub use intent::Intent;
pub use policy::ExecutionPolicy;
pub use tick::{run_frame, FrameReport};
