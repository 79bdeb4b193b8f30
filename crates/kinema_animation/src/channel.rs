//! Channels sample one (time, data) curve pair into a listener slot.
//!
//! Evaluation is a two-step inversion. The time curve `X(t)` of the active
//! segment is solved for the local parameter `t` at which it reaches the
//! requested time, then every component of the data curve is evaluated at
//! that `t`:
//!
//! ```text
//! time ──find_zero(X)──► t ──eval_bezier(Y_i)──► slot[offset + i]
//! ```
//!
//! The active segment is cached between ticks and moved by a local scan, so
//! steady playback costs O(1) per tick.

use std::rc::Rc;
use std::sync::Arc;

use kinema_core::{EvaluatorSettings, KinemaError, Result, eval_bezier, find_zero_with_tolerance};

use crate::clip::Animation;
use crate::listener::{ListenerRegistry, SharedRegistry, SlotBinding};
use crate::sampler::Sampler;

#[derive(Debug)]
struct Bound {
    time_sampler: usize,
    data_sampler: usize,
    binding: SlotBinding,
    start_time: f32,
    end_time: f32,
    current_segment: usize,
}

/// A bound channel. Dropping it returns its slot reference to the registry.
#[derive(Debug)]
pub struct Channel {
    id: String,
    target: String,
    animation: Arc<Animation>,
    registry: SharedRegistry,
    bound: Option<Bound>,
    epsilon: f32,
    report_failures: bool,
}

impl Channel {
    /// Builds the channel for `animation.channels[index]` and binds its target.
    ///
    /// Configuration problems are logged and leave the channel inert. Only an
    /// out-of-range `index` is an error.
    ///
    /// # Panics
    ///
    /// Panics if `registry` is already borrowed.
    pub fn new(
        animation: &Arc<Animation>,
        index: usize,
        registry: &SharedRegistry,
        settings: &EvaluatorSettings,
    ) -> Result<Self> {
        let descriptor = animation
            .channels
            .get(index)
            .ok_or_else(|| KinemaError::MissingChannel {
                animation: animation.id.clone(),
                index,
            })?;
        let bound = match Self::bind(animation, index, &mut registry.borrow_mut()) {
            Ok(bound) => Some(bound),
            Err(err) => {
                log::error!(
                    "Channel '{}' of animation '{}' disabled: {err}",
                    descriptor.id,
                    animation.id
                );
                None
            }
        };

        Ok(Self {
            id: descriptor.id.clone(),
            target: descriptor.target.clone(),
            animation: Arc::clone(animation),
            registry: Rc::clone(registry),
            bound,
            epsilon: settings.inversion_epsilon,
            report_failures: settings.report_inversion_failures,
        })
    }

    fn bind(animation: &Animation, index: usize, registry: &mut ListenerRegistry) -> Result<Bound> {
        let descriptor = &animation.channels[index];
        let lookup = |id: &str| {
            animation
                .sampler_index(id)
                .ok_or_else(|| KinemaError::MissingSampler {
                    animation: animation.id.clone(),
                    sampler: id.to_string(),
                })
        };
        let time_index = lookup(&descriptor.time_sampler)?;
        let data_index = lookup(&descriptor.data_sampler)?;
        let time = &animation.samplers[time_index];
        let data = &animation.samplers[data_index];

        if time.components() != 1 {
            return Err(KinemaError::TimeSamplerNotScalar {
                sampler: time.id().to_string(),
                components: time.components(),
            });
        }
        if time.segment_count() != data.segment_count() {
            return Err(KinemaError::SegmentCountMismatch {
                time_sampler: time.id().to_string(),
                time_segments: time.segment_count(),
                data_sampler: data.id().to_string(),
                data_segments: data.segment_count(),
            });
        }

        let binding = registry.acquire_with_offset(&descriptor.target, data.components());
        if binding.is_scratch() {
            log::warn!(
                "Channel '{}' writes to a scratch buffer; target '{}' is not addressable",
                descriptor.id,
                descriptor.target
            );
        }

        Ok(Bound {
            time_sampler: time_index,
            data_sampler: data_index,
            binding,
            start_time: time.first_point(0),
            end_time: time.last_point(0),
            current_segment: 0,
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// `false` when construction failed and updates are no-ops.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.bound.is_some()
    }

    /// Index of the segment used by the last interpolated update.
    #[must_use]
    pub fn current_segment(&self) -> Option<usize> {
        self.bound.as_ref().map(|b| b.current_segment)
    }

    /// `(start, end)` of the time curve.
    #[must_use]
    pub fn time_range(&self) -> Option<(f32, f32)> {
        self.bound.as_ref().map(|b| (b.start_time, b.end_time))
    }

    #[must_use]
    pub fn binding(&self) -> Option<&SlotBinding> {
        self.bound.as_ref().map(|b| &b.binding)
    }

    /// Samples the channel at `time` and writes the result.
    ///
    /// An inversion failure leaves the previous slot value in place.
    pub fn update(&mut self, time: f32, registry: &mut ListenerRegistry) {
        if let Err(err) = self.try_update(time, registry) {
            if self.report_failures {
                log::warn!("Channel '{}': {err}", self.id);
            } else {
                log::debug!("Channel '{}': {err}", self.id);
            }
        }
    }

    /// Like [`update`](Self::update), returning inversion failures.
    pub fn try_update(&mut self, time: f32, registry: &mut ListenerRegistry) -> Result<()> {
        let Some(bound) = self.bound.as_mut() else {
            return Ok(());
        };
        let time_sampler = &self.animation.samplers[bound.time_sampler];
        let data_sampler = &self.animation.samplers[bound.data_sampler];

        if time <= bound.start_time {
            write_points(registry, bound, data_sampler, Sampler::first_point);
            return Ok(());
        }
        if time >= bound.end_time {
            write_points(registry, bound, data_sampler, Sampler::last_point);
            return Ok(());
        }

        let segment = seek_segment(time_sampler, bound.current_segment, time);
        bound.current_segment = segment;

        let [x1, x2, x3, x4] = time_sampler.segment(0, segment);
        let t = find_zero_with_tolerance(x1, x2, x3, x4, time, self.epsilon).ok_or(
            KinemaError::InversionFailed {
                x: time,
                segment,
                x1,
                x2,
                x3,
                x4,
            },
        )?;

        for component in 0..data_sampler.components() {
            let [p1, p2, p3, p4] = data_sampler.segment(component, segment);
            registry.write(&mut bound.binding, component, eval_bezier(p1, p2, p3, p4, t));
        }
        Ok(())
    }

    /// Returns the slot reference held by this channel. Further updates are
    /// no-ops.
    ///
    /// For callers that already hold the registry borrow; dropping the
    /// channel does the same.
    pub fn release(&mut self, registry: &mut ListenerRegistry) {
        if let Some(mut bound) = self.bound.take() {
            let _ = registry.release_binding(&mut bound.binding);
        }
    }
}

impl Drop for Channel {
    fn drop(&mut self) {
        let Some(mut bound) = self.bound.take() else {
            return;
        };
        match self.registry.try_borrow_mut() {
            Ok(mut registry) => {
                let _ = registry.release_binding(&mut bound.binding);
            }
            Err(_) => log::error!("Channel '{}' dropped while the registry is borrowed", self.id),
        }
    }
}

fn write_points(
    registry: &mut ListenerRegistry,
    bound: &mut Bound,
    data: &Sampler,
    point: fn(&Sampler, usize) -> f32,
) {
    for component in 0..data.components() {
        registry.write(&mut bound.binding, component, point(data, component));
    }
}

/// Moves the segment cursor from `current` to the segment containing `time`.
///
/// Only called with `time` strictly inside the curve's time range.
fn seek_segment(time: &Sampler, current: usize, t: f32) -> usize {
    let last = time.segment_count().saturating_sub(1);
    let mut segment = current.min(last);

    while segment < last && time.segment_start(segment + 1) <= t {
        segment += 1;
    }
    while segment > 0 && time.segment_start(segment) >= t {
        segment -= 1;
    }
    segment
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(points: Vec<f32>) -> Sampler {
        Sampler::new("time", 1, points).unwrap()
    }

    #[test]
    fn seek_walks_forward_and_back() {
        // Segments start at 0, 1, 2.
        let s = times(vec![0.0, 0.33, 0.66, 1.0, 1.33, 1.66, 2.0, 2.33, 2.66, 3.0]);
        assert_eq!(seek_segment(&s, 0, 0.5), 0);
        assert_eq!(seek_segment(&s, 0, 1.5), 1);
        assert_eq!(seek_segment(&s, 0, 2.5), 2);
        assert_eq!(seek_segment(&s, 2, 0.5), 0);
        assert_eq!(seek_segment(&s, 1, 1.5), 1);
    }

    #[test]
    fn seek_prefers_earlier_segment_on_border() {
        let s = times(vec![0.0, 0.33, 0.66, 1.0, 1.33, 1.66, 2.0]);
        assert_eq!(seek_segment(&s, 1, 1.0), 0);
    }

    #[test]
    fn seek_clamps_stale_cursor() {
        let s = times(vec![0.0, 0.33, 0.66, 1.0]);
        assert_eq!(seek_segment(&s, 7, 0.5), 0);
    }

    fn ramp() -> Arc<Animation> {
        let time = times(vec![0.0, 0.33, 0.66, 1.0]);
        let data = Sampler::new("data", 1, vec![0.0, 0.33, 0.66, 1.0]).unwrap();
        let channel = crate::clip::ChannelDescriptor::new("c", "v", "time", "data");
        Arc::new(Animation::new("ramp", vec![time, data], vec![channel]))
    }

    #[test]
    fn dropped_channel_releases_slot() {
        let registry = ListenerRegistry::shared();
        registry.borrow_mut().acquire("v", 1).unwrap();

        let channel = Channel::new(&ramp(), 0, &registry, &EvaluatorSettings::default()).unwrap();
        assert!(channel.is_active());
        assert_eq!(registry.borrow().use_count("v"), Some(2));

        drop(channel);
        assert_eq!(registry.borrow().use_count("v"), Some(1));
    }

    #[test]
    fn explicit_release_is_not_repeated_on_drop() {
        let registry = ListenerRegistry::shared();
        registry.borrow_mut().acquire("v", 1).unwrap();

        let mut channel = Channel::new(&ramp(), 0, &registry, &EvaluatorSettings::default()).unwrap();
        channel.release(&mut registry.borrow_mut());
        assert!(!channel.is_active());
        drop(channel);
        assert_eq!(registry.borrow().use_count("v"), Some(1));
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let registry = ListenerRegistry::shared();
        let err = Channel::new(&ramp(), 1, &registry, &EvaluatorSettings::default()).unwrap_err();
        assert_eq!(
            err,
            KinemaError::MissingChannel {
                animation: "ramp".to_string(),
                index: 1,
            }
        );
        assert!(registry.borrow().is_empty());
    }
}
