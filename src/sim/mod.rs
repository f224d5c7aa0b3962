//! Frame-driven simulation plumbing shared by every game
//!
//! Nothing in here knows about a particular game. The clock turns host
//! timestamps into clamped frame deltas, the input source turns pointer
//! callbacks into per-frame edges, the scheduler holds a session's deferred
//! events and `scoring` holds the accuracy math.

pub mod clock;
pub mod input;
pub mod schedule;
pub mod scoring;

pub use clock::FrameClock;
pub use input::{FrameInput, InputEventSource, PressEdge, PressKind};
pub use schedule::{Scheduled, Scheduler};
