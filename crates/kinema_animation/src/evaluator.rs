//! The animation evaluator.
//!
//! Owns the global clock, the set of active animations and the listener
//! registry they write into. A typical frame:
//!
//! ```rust,ignore
//! evaluator.update(dt);        // channels write listener slots
//! graph.update_all();          // transforms read them back
//! ```

use std::rc::Rc;
use std::sync::Arc;

use kinema_core::{EvaluatorSettings, Result};

use crate::clip::Animation;
use crate::entry::AnimationEntry;
use crate::listener::{AnimListener, ListenerRegistry, SharedRegistry};
use crate::values::ListenerValue;

pub struct Evaluator {
    registry: SharedRegistry,
    // Registration order is evaluation order.
    entries: Vec<AnimationEntry>,
    time: f32,
    settings: EvaluatorSettings,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(EvaluatorSettings::default())
    }

    #[must_use]
    pub fn with_settings(settings: EvaluatorSettings) -> Self {
        Self {
            registry: ListenerRegistry::shared(),
            entries: Vec::new(),
            time: settings.start_time,
            settings,
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EvaluatorSettings {
        &self.settings
    }

    /// Handle onto the listener registry.
    #[must_use]
    pub fn registry(&self) -> SharedRegistry {
        Rc::clone(&self.registry)
    }

    /// Acquires a typed listener on the evaluator's registry.
    pub fn listener<T: ListenerValue>(&self, name: impl Into<String>) -> Result<AnimListener<T>> {
        AnimListener::new(&self.registry, name)
    }

    /// Starts playing `animation`, shifted by `time_offset`.
    ///
    /// Channels bind their targets now, so the listeners they drive must
    /// already exist. Adding an id that is already active does nothing.
    pub fn add_animation(&mut self, animation: Arc<Animation>, time_offset: f32) {
        if self.is_active(&animation.id) {
            log::debug!("Animation '{}' is already active", animation.id);
            return;
        }

        let entry = AnimationEntry::new(animation, time_offset, &self.registry, &self.settings);
        log::debug!(
            "Added animation '{}' with {} channels",
            entry.id(),
            entry.channels().len()
        );
        self.entries.push(entry);
    }

    /// Stops `id` and releases its channel bindings. Returns whether it was
    /// active.
    pub fn remove_animation(&mut self, id: &str) -> bool {
        let Some(index) = self.entries.iter().position(|e| e.id() == id) else {
            return false;
        };
        drop(self.entries.remove(index));
        log::debug!("Removed animation '{id}'");
        true
    }

    /// Advances the clock by `dt`.
    pub fn update(&mut self, dt: f32) {
        self.update_absolute(self.time + dt);
    }

    /// Sets the clock to `time` and evaluates every active animation.
    ///
    /// Animations run in registration order; when two channels share a
    /// slot the later one wins.
    pub fn update_absolute(&mut self, time: f32) {
        self.time = time;
        let mut registry = self.registry.borrow_mut();
        for entry in &mut self.entries {
            entry.update(time, &mut registry);
        }
    }

    #[inline]
    #[must_use]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[must_use]
    pub fn is_active(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    #[inline]
    #[must_use]
    pub fn animation_count(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn entry(&self, id: &str) -> Option<&AnimationEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &AnimationEntry> {
        self.entries.iter()
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("time", &self.time)
            .field("animations", &self.entries.len())
            .field("listeners", &self.registry.try_borrow().map(|r| r.len()).ok())
            .finish_non_exhaustive()
    }
}
