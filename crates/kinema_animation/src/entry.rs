use std::sync::Arc;

use kinema_core::EvaluatorSettings;

use crate::channel::Channel;
use crate::clip::Animation;
use crate::listener::{ListenerRegistry, SharedRegistry};

/// An animation registered with the evaluator.
///
/// Owns one [`Channel`] per descriptor, in declaration order, and plays them
/// shifted by a fixed time offset. Dropping the entry releases every slot
/// reference its channels hold.
#[derive(Debug)]
pub struct AnimationEntry {
    animation: Arc<Animation>,
    time_offset: f32,
    channels: Vec<Channel>,
}

impl AnimationEntry {
    /// # Panics
    ///
    /// Panics if `registry` is already borrowed.
    pub fn new(
        animation: Arc<Animation>,
        time_offset: f32,
        registry: &SharedRegistry,
        settings: &EvaluatorSettings,
    ) -> Self {
        // Every index is in range, so no channel is skipped.
        let channels = (0..animation.channels.len())
            .filter_map(|index| Channel::new(&animation, index, registry, settings).ok())
            .collect();

        Self {
            animation,
            time_offset,
            channels,
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.animation.id
    }

    #[inline]
    #[must_use]
    pub fn animation(&self) -> &Arc<Animation> {
        &self.animation
    }

    #[inline]
    #[must_use]
    pub fn time_offset(&self) -> f32 {
        self.time_offset
    }

    #[inline]
    #[must_use]
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// Updates every channel at `time + time_offset`.
    pub fn update(&mut self, time: f32, registry: &mut ListenerRegistry) {
        let local = time + self.time_offset;
        for channel in &mut self.channels {
            channel.update(local, registry);
        }
    }
}
