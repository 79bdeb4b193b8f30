use glam::{Mat4, Vec3};
use kinema_animation::Evaluator;
use kinema_core::Result;

use crate::graph::NodeKey;
use crate::transform::Transform;

/// A node of the transform hierarchy.
///
/// Its world matrix is the dependency's world matrix followed by the node's
/// own transforms, applied in insertion order:
///
/// ```text
/// matrix  = dependency.matrix · T1 · T2 · … · Tk
/// inverse = Tk⁻¹ · … · T1⁻¹ · dependency.inverse
/// ```
#[derive(Debug, Clone)]
pub struct TransformNode {
    id: String,
    dependency: Option<NodeKey>,
    transforms: Vec<Transform>,
    matrix: Mat4,
    inverse_matrix: Mat4,
    has_changed: bool,
    composed: bool,
}

impl TransformNode {
    /// A node with no transforms and identity matrices.
    ///
    /// A root node runs its first update here and reports a change. A node
    /// with a dependency cannot see the dependency's matrices, so its first
    /// update is left to the caller;
    /// [`TransformGraph::insert`](crate::TransformGraph::insert) runs it.
    #[must_use]
    pub fn new(id: impl Into<String>, dependency: Option<NodeKey>) -> Self {
        let mut node = Self {
            id: id.into(),
            dependency,
            transforms: Vec::new(),
            matrix: Mat4::IDENTITY,
            inverse_matrix: Mat4::IDENTITY,
            has_changed: true,
            composed: false,
        };
        if dependency.is_none() {
            node.update(None);
        }
        node
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn dependency(&self) -> Option<NodeKey> {
        self.dependency
    }

    #[inline]
    #[must_use]
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Recomposes the world matrices.
    ///
    /// `dependency` is the `(matrix, inverse)` pair of the node this one
    /// depends on, already updated for this frame. Returns whether the world
    /// matrix changed; the very first composition always counts as a change.
    pub fn update(&mut self, dependency: Option<(&Mat4, &Mat4)>) -> bool {
        let (mut matrix, mut inverse) =
            dependency.map_or((Mat4::IDENTITY, Mat4::IDENTITY), |(m, inv)| (*m, *inv));

        for transform in &mut self.transforms {
            let local = transform.get_matrix();
            matrix *= local;
            inverse = local.inverse() * inverse;
        }

        self.has_changed = !self.composed || matrix != self.matrix;
        self.composed = true;
        if self.has_changed {
            self.matrix = matrix;
            self.inverse_matrix = inverse;
        }
        self.has_changed
    }

    /// Local-to-world matrix.
    #[inline]
    #[must_use]
    pub fn get_matrix(&self) -> Mat4 {
        self.matrix
    }

    /// World-to-local matrix.
    #[inline]
    #[must_use]
    pub fn get_inverse_matrix(&self) -> Mat4 {
        self.inverse_matrix
    }

    /// Whether the last update changed the world matrix.
    #[inline]
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.has_changed
    }

    /// World-space origin of the node.
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.matrix.transform_point3(Vec3::ZERO)
    }

    /// Replaces the world matrix until the next update.
    pub fn override_transform(&mut self, matrix: Mat4) {
        self.matrix = matrix;
        self.inverse_matrix = matrix.inverse();
    }

    pub fn add_transform(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    pub fn add_look_at(
        &mut self,
        id: impl Into<String>,
        position: Vec3,
        point_of_interest: Vec3,
        up: Vec3,
        evaluator: &Evaluator,
    ) -> Result<()> {
        let transform = Transform::look_at(id, position, point_of_interest, up, evaluator)?;
        self.add_transform(transform);
        Ok(())
    }

    pub fn add_matrix(&mut self, id: impl Into<String>, matrix: Mat4, evaluator: &Evaluator) -> Result<()> {
        let transform = Transform::matrix(id, matrix, evaluator)?;
        self.add_transform(transform);
        Ok(())
    }

    pub fn add_rotate(
        &mut self,
        id: impl Into<String>,
        axis: Vec3,
        angle: f32,
        evaluator: &Evaluator,
    ) -> Result<()> {
        let transform = Transform::rotate(id, axis, angle, evaluator)?;
        self.add_transform(transform);
        Ok(())
    }

    pub fn add_scale(&mut self, id: impl Into<String>, value: Vec3, evaluator: &Evaluator) -> Result<()> {
        let transform = Transform::scale(id, value, evaluator)?;
        self.add_transform(transform);
        Ok(())
    }

    pub fn add_translate(&mut self, id: impl Into<String>, value: Vec3, evaluator: &Evaluator) -> Result<()> {
        let transform = Transform::translate(id, value, evaluator)?;
        self.add_transform(transform);
        Ok(())
    }

    /// Drops all transforms, releasing their listeners.
    pub fn clear_transforms(&mut self) {
        self.transforms.clear();
    }
}
