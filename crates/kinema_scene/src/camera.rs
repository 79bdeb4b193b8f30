use glam::{Mat4, Vec3, Vec4};
use kinema_animation::{AnimListener, Evaluator};
use kinema_core::{KinemaError, Result};

use crate::graph::{NodeKey, TransformGraph};

/// The axis the field of view angle is measured along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FovAxis {
    X,
    Y,
}

/// A perspective camera attached to a transform node.
///
/// The camera looks down the node's -Z axis. Field of view (degrees) and the
/// clip planes are listener slots: `id/fov_value`, `id_z_near`, `id_z_far`.
#[derive(Debug, Clone)]
pub struct Camera {
    id: String,
    node: NodeKey,
    fov_axis: FovAxis,
    fov: AnimListener<f32>,
    z_near: AnimListener<f32>,
    z_far: AnimListener<f32>,
    target: Option<NodeKey>,
    pub use_target: bool,
}

impl Camera {
    pub fn new(
        id: impl Into<String>,
        fov: f32,
        fov_axis: FovAxis,
        z_near: f32,
        z_far: f32,
        node: NodeKey,
        evaluator: &Evaluator,
    ) -> Result<Self> {
        let id = id.into();
        let registry = evaluator.registry();
        Ok(Self {
            fov: AnimListener::with_value(&registry, format!("{id}/fov_value"), fov)?,
            z_near: AnimListener::with_value(&registry, format!("{id}_z_near"), z_near)?,
            z_far: AnimListener::with_value(&registry, format!("{id}_z_far"), z_far)?,
            id,
            node,
            fov_axis,
            target: None,
            use_target: true,
        })
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn node(&self) -> NodeKey {
        self.node
    }

    #[inline]
    #[must_use]
    pub fn fov_axis(&self) -> FovAxis {
        self.fov_axis
    }

    /// Field of view in degrees, along [`fov_axis`](Self::fov_axis).
    #[must_use]
    pub fn fov(&self) -> f32 {
        self.fov.value()
    }

    pub fn set_fov(&self, degrees: f32) {
        self.fov.set(degrees);
    }

    #[must_use]
    pub fn z_near(&self) -> f32 {
        self.z_near.value()
    }

    pub fn set_z_near(&self, value: f32) {
        self.z_near.set(value);
    }

    #[must_use]
    pub fn z_far(&self) -> f32 {
        self.z_far.value()
    }

    pub fn set_z_far(&self, value: f32) {
        self.z_far.set(value);
    }

    #[inline]
    #[must_use]
    pub fn target(&self) -> Option<NodeKey> {
        self.target
    }

    /// Node whose origin defines the focus plane.
    pub fn set_target(&mut self, target: Option<NodeKey>) {
        self.target = target;
    }

    /// Vertical field of view in degrees.
    ///
    /// A horizontal angle is converted with `aspect = tan(x/2) / tan(y/2)`.
    #[must_use]
    pub fn y_fov(&self, aspect: f32) -> f32 {
        match self.fov_axis {
            FovAxis::Y => self.fov(),
            FovAxis::X => {
                let half_x = self.fov().to_radians() * 0.5;
                (2.0 * (half_x.tan() / aspect).atan()).to_degrees()
            }
        }
    }

    /// Right-handed perspective projection with a `[-1, 1]` depth range.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.y_fov(aspect).to_radians(), aspect, self.z_near(), self.z_far())
    }

    pub fn world_location(&self, graph: &TransformGraph) -> Result<Vec3> {
        let node = graph.get(self.node).ok_or(KinemaError::NodeNotFound)?;
        Ok(node.world_position())
    }

    /// World-to-camera matrix.
    pub fn view_matrix(&self, graph: &TransformGraph) -> Result<Mat4> {
        let node = graph.get(self.node).ok_or(KinemaError::NodeNotFound)?;
        Ok(node.get_inverse_matrix())
    }

    /// View-space distance to the target's focus plane.
    ///
    /// Falls back to `default` without a target, with `use_target` off, or
    /// when the target node is gone.
    pub fn focus_depth(&self, graph: &TransformGraph, default: f32) -> Result<f32> {
        let target = match self.target {
            Some(key) if self.use_target => graph.get(key),
            _ => None,
        };
        let Some(target) = target else {
            return Ok(default);
        };

        let view = self.view_matrix(graph)?;
        Ok(-view.transform_point3(target.world_position()).z)
    }

    pub fn frustum(&self, graph: &TransformGraph, aspect: f32) -> Result<Frustum> {
        let view = self.view_matrix(graph)?;
        Ok(Frustum::from_matrix(self.projection_matrix(aspect) * view))
    }

    /// Pins the camera's world matrix until the node is next updated.
    pub fn override_transform(&self, graph: &mut TransformGraph, matrix: Mat4) -> Result<()> {
        let node = graph.get_mut(self.node).ok_or(KinemaError::NodeNotFound)?;
        node.override_transform(matrix);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrustumPlane {
    Left = 0,
    Right = 1,
    Bottom = 2,
    Top = 3,
    Near = 4,
    Far = 5,
}

/// Six clip planes in world space, normals pointing inward.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frustum {
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extracts the planes of a GL-style view-projection matrix
    /// (Gribb-Hartmann).
    #[must_use]
    pub fn from_matrix(m: Mat4) -> Self {
        let rows = [m.row(0), m.row(1), m.row(2), m.row(3)];
        let mut planes = [
            rows[3] + rows[0],
            rows[3] - rows[0],
            rows[3] + rows[1],
            rows[3] - rows[1],
            rows[3] + rows[2],
            rows[3] - rows[2],
        ];

        for plane in &mut planes {
            let length = plane.truncate().length();
            if length > 0.0 {
                *plane /= length;
            }
        }

        Self { planes }
    }

    /// Plane as `(normal, distance)` packed into a `Vec4`.
    #[must_use]
    pub fn plane(&self, plane: FrustumPlane) -> Vec4 {
        self.planes[plane as usize]
    }

    /// `false` only when the sphere lies entirely outside one of the planes.
    #[must_use]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.truncate().dot(center) + plane.w >= -radius)
    }
}
