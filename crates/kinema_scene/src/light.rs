use glam::{Vec2, Vec3, Vec4};
use kinema_animation::{AnimListener, Evaluator};
use kinema_core::{KinemaError, Result};

use crate::graph::{NodeKey, TransformGraph};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// Constant, linear and quadratic attenuation factors.
    pub attenuation: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub attenuation: Vec3,
    /// Cone angle in degrees and falloff exponent.
    pub spot_attenuation: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    Directional,
    Point(PointLight),
    Spot(SpotLight),
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

impl Default for SpotLight {
    fn default() -> Self {
        Self {
            attenuation: Vec3::new(1.0, 0.0, 0.0),
            spot_attenuation: Vec2::new(180.0, 0.0),
        }
    }
}

/// A light attached to a transform node.
///
/// Color and multiplier are listener slots (`id/intensity`, a 4-component
/// color, and `id/multiplier`), so both can be animated.
#[derive(Debug, Clone)]
pub struct Light {
    id: String,
    kind: LightKind,
    node: NodeKey,
    intensity: AnimListener<Vec4>,
    multiplier: AnimListener<f32>,
    pub cast_shadows: bool,
}

impl Light {
    pub fn new(
        id: impl Into<String>,
        kind: LightKind,
        intensity: Vec3,
        multiplier: f32,
        node: NodeKey,
        evaluator: &Evaluator,
    ) -> Result<Self> {
        let id = id.into();
        let registry = evaluator.registry();
        let light = Self {
            intensity: AnimListener::new(&registry, format!("{id}/intensity"))?,
            multiplier: AnimListener::new(&registry, format!("{id}/multiplier"))?,
            id,
            kind,
            node,
            cast_shadows: false,
        };
        light.set_intensity(intensity);
        light.set_multiplier(multiplier);
        Ok(light)
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut LightKind {
        &mut self.kind
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeKey {
        self.node
    }

    /// RGB color. The animated slot holds four components; alpha is ignored.
    #[must_use]
    pub fn intensity(&self) -> Vec3 {
        self.intensity.value().truncate()
    }

    pub fn set_intensity(&self, intensity: Vec3) {
        self.intensity.set(intensity.extend(1.0));
    }

    #[must_use]
    pub fn multiplier(&self) -> f32 {
        self.multiplier.value()
    }

    pub fn set_multiplier(&self, multiplier: f32) {
        self.multiplier.set(multiplier);
    }

    #[must_use]
    pub fn multiplied_intensity(&self) -> Vec3 {
        self.intensity() * self.multiplier()
    }

    pub fn world_position(&self, graph: &TransformGraph) -> Result<Vec3> {
        let node = graph.get(self.node).ok_or(KinemaError::NodeNotFound)?;
        Ok(node.world_position())
    }

    /// The node's -Z axis in world space.
    pub fn world_direction(&self, graph: &TransformGraph) -> Result<Vec3> {
        let node = graph.get(self.node).ok_or(KinemaError::NodeNotFound)?;
        Ok(node.get_matrix().transform_vector3(Vec3::NEG_Z).normalize())
    }
}
