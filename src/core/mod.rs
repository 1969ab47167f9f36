//! # Core Frame Hand-off
//!
//! The frame type and the bounded channel that moves frames from the agent
//! loop to the render loop.

pub mod frame;
pub mod frame_channel;

pub use frame::{Frame, IntoFrame, PixelLayout, RawImage};
pub use frame_channel::{ChannelStats, FrameChannel, SubmitOutcome};
