//! Piecewise cubic curve data.
//!
//! A sampler stores one or more curves ("components") back to back. Each
//! curve is a chain of `segment_count` cubic Bezier segments that share their
//! border points, so it holds `segment_count * 3 + 1` control points:
//!
//! ```text
//! component 0: P0 P1 P2 P3 P4 P5 P6 ...   (segment k = P[3k..=3k+3])
//! component 1: ...
//! ```

use kinema_core::{KinemaError, Result};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "SamplerData"))]
pub struct Sampler {
    id: String,
    components: usize,
    segment_count: usize,
    control_points: Vec<f32>,
}

impl Sampler {
    /// Builds a sampler, deriving the segment count from the data length.
    ///
    /// Fails unless the control points split into `components` curves of
    /// `3n + 1` points each.
    pub fn new(
        id: impl Into<String>,
        components: usize,
        control_points: Vec<f32>,
    ) -> Result<Self> {
        let id = id.into();
        let malformed = |reason: String| KinemaError::MalformedSampler {
            sampler: id.clone(),
            reason,
        };

        if components == 0 {
            return Err(malformed("component count is zero".to_string()));
        }
        if control_points.is_empty() || control_points.len() % components != 0 {
            return Err(malformed(format!(
                "{} control points do not split into {components} components",
                control_points.len()
            )));
        }

        let per_component = control_points.len() / components;
        if (per_component - 1) % 3 != 0 {
            return Err(malformed(format!(
                "{per_component} points per component is not 3n + 1"
            )));
        }

        Ok(Self {
            segment_count: (per_component - 1) / 3,
            id,
            components,
            control_points,
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn components(&self) -> usize {
        self.components
    }

    #[inline]
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    #[inline]
    #[must_use]
    pub fn control_points(&self) -> &[f32] {
        &self.control_points
    }

    /// Number of control points of a single component curve.
    #[inline]
    #[must_use]
    pub fn points_per_component(&self) -> usize {
        self.segment_count * 3 + 1
    }

    /// The full curve of one component.
    ///
    /// # Panics
    ///
    /// Panics if `component >= self.components()`.
    #[must_use]
    pub fn curve(&self, component: usize) -> &[f32] {
        let len = self.points_per_component();
        let start = component * len;
        &self.control_points[start..start + len]
    }

    /// The four control points of `segment` on `component`.
    ///
    /// # Panics
    ///
    /// Panics if `component` or `segment` is out of range.
    #[must_use]
    pub fn segment(&self, component: usize, segment: usize) -> [f32; 4] {
        let curve = self.curve(component);
        let base = segment * 3;
        [curve[base], curve[base + 1], curve[base + 2], curve[base + 3]]
    }

    /// Start value of a segment on the first component.
    ///
    /// For time samplers this is the segment's start time.
    ///
    /// # Panics
    ///
    /// Panics if `segment * 3` indexes past the control points.
    #[inline]
    #[must_use]
    pub fn segment_start(&self, segment: usize) -> f32 {
        self.control_points[segment * 3]
    }

    /// # Panics
    ///
    /// Panics if `component >= self.components()`, as does
    /// [`last_point`](Self::last_point).
    #[must_use]
    pub fn first_point(&self, component: usize) -> f32 {
        self.curve(component)[0]
    }

    #[must_use]
    pub fn last_point(&self, component: usize) -> f32 {
        self.curve(component)[self.segment_count * 3]
    }
}

/// Unvalidated wire form of a [`Sampler`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SamplerData {
    id: String,
    components: usize,
    control_points: Vec<f32>,
}

#[cfg(feature = "serde")]
impl TryFrom<SamplerData> for Sampler {
    type Error = KinemaError;

    fn try_from(data: SamplerData) -> Result<Self> {
        Sampler::new(data.id, data.components, data.control_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic]
    fn segment_past_last_component_panics() {
        let s = Sampler::new("s", 2, vec![0.0; 8]).unwrap();
        let _ = s.segment(2, 0);
    }

    #[test]
    fn derives_segment_count() {
        let s = Sampler::new("s", 2, vec![0.0; 14]).unwrap();
        assert_eq!(s.segment_count(), 2);
        assert_eq!(s.points_per_component(), 7);
        assert_eq!(s.control_points().len(), s.components() * (s.segment_count() * 3 + 1));
    }

    #[test]
    fn splits_components() {
        let s = Sampler::new("s", 2, vec![0.0, 1.0, 2.0, 3.0, 10.0, 11.0, 12.0, 13.0]).unwrap();
        assert_eq!(s.curve(1), &[10.0, 11.0, 12.0, 13.0]);
        assert_eq!(s.segment(1, 0), [10.0, 11.0, 12.0, 13.0]);
        assert_eq!(s.first_point(0), 0.0);
        assert_eq!(s.last_point(1), 13.0);
    }

    #[test]
    fn rejects_malformed_data() {
        assert!(Sampler::new("s", 0, vec![0.0; 4]).is_err());
        assert!(Sampler::new("s", 1, vec![]).is_err());
        assert!(Sampler::new("s", 1, vec![0.0; 5]).is_err());
        assert!(Sampler::new("s", 3, vec![0.0; 8]).is_err());
    }

    #[test]
    fn single_point_curve_has_no_segments() {
        let s = Sampler::new("s", 1, vec![2.5]).unwrap();
        assert_eq!(s.segment_count(), 0);
        assert_eq!(s.first_point(0), s.last_point(0));
    }
}
