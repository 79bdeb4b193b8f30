//! Keyframe animation runtime: samplers, channels, listener slots and the
//! evaluator that drives them.

pub mod channel;
pub mod clip;
pub mod entry;
pub mod evaluator;
pub mod listener;
pub mod sampler;
pub mod values;

pub use channel::Channel;
pub use clip::{Animation, ChannelDescriptor};
pub use entry::AnimationEntry;
pub use evaluator::Evaluator;
pub use listener::{AnimListener, ListenerRegistry, SharedRegistry, SlotBinding, SlotKey};
pub use sampler::Sampler;
pub use values::ListenerValue;
