use crate::sampler::Sampler;

/// Binds a (time, data) sampler pair to a named output target.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct ChannelDescriptor {
    pub id: String,
    /// Listener name, optionally with a component suffix (`"lamp/intensity.G"`).
    pub target: String,
    pub time_sampler: String,
    pub data_sampler: String,
}

impl ChannelDescriptor {
    pub fn new(
        id: impl Into<String>,
        target: impl Into<String>,
        time_sampler: impl Into<String>,
        data_sampler: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            target: target.into(),
            time_sampler: time_sampler.into(),
            data_sampler: data_sampler.into(),
        }
    }
}

/// An animation as delivered by the asset loader.
///
/// Immutable once handed to the evaluator; channels reference its samplers
/// by index.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct Animation {
    pub id: String,
    pub samplers: Vec<Sampler>,
    pub channels: Vec<ChannelDescriptor>,
}

impl Animation {
    #[must_use]
    pub fn new(id: impl Into<String>, samplers: Vec<Sampler>, channels: Vec<ChannelDescriptor>) -> Self {
        Self {
            id: id.into(),
            samplers,
            channels,
        }
    }

    /// Index of the sampler with the given id.
    ///
    /// When ids repeat, the last sampler wins.
    #[must_use]
    pub fn sampler_index(&self, id: &str) -> Option<usize> {
        self.samplers.iter().rposition(|s| s.id() == id)
    }

    #[must_use]
    pub fn sampler(&self, id: &str) -> Option<&Sampler> {
        self.sampler_index(id).map(|i| &self.samplers[i])
    }

    /// Latest end time over all channel time curves, `0.0` when empty.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.channels
            .iter()
            .filter_map(|c| self.sampler(&c.time_sampler))
            .map(|s| s.last_point(0))
            .fold(0.0_f32, f32::max)
    }
}
