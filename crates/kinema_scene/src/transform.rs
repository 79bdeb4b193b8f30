use glam::{Mat4, Vec3};
use kinema_animation::{AnimListener, Evaluator};
use kinema_core::Result;

/// The parameters of one animatable transform.
///
/// Every parameter is a listener slot, so channels can drive it. Slot names
/// derive from the transform id:
///
/// | kind      | slots                                             |
/// |-----------|---------------------------------------------------|
/// | LookAt    | `id/position`, `id/point_of_interest`, `id/up`    |
/// | Rotate    | `id/axis`, `id/angle` (degrees)                   |
/// | Matrix    | `id`                                              |
/// | Scale     | `id`                                              |
/// | Translate | `id`                                              |
#[derive(Debug, Clone)]
pub enum TransformKind {
    LookAt {
        position: AnimListener<Vec3>,
        point_of_interest: AnimListener<Vec3>,
        up: AnimListener<Vec3>,
    },
    Matrix {
        matrix: AnimListener<Mat4>,
    },
    Rotate {
        axis: AnimListener<Vec3>,
        angle: AnimListener<f32>,
    },
    Scale {
        value: AnimListener<Vec3>,
    },
    Translate {
        value: AnimListener<Vec3>,
    },
}

/// A single local transform step of a [`TransformNode`](crate::TransformNode).
#[derive(Debug, Clone)]
pub struct Transform {
    id: String,
    kind: TransformKind,
    matrix: Mat4,
}

impl Transform {
    fn from_kind(id: String, kind: TransformKind) -> Self {
        let mut transform = Self {
            id,
            kind,
            matrix: Mat4::IDENTITY,
        };
        transform.matrix = transform.calculate_matrix();
        transform
    }

    /// A camera-style placement: the inverse of the view matrix looking from
    /// `position` towards `point_of_interest`.
    pub fn look_at(
        id: impl Into<String>,
        position: Vec3,
        point_of_interest: Vec3,
        up: Vec3,
        evaluator: &Evaluator,
    ) -> Result<Self> {
        let id = id.into();
        let registry = evaluator.registry();
        let kind = TransformKind::LookAt {
            position: AnimListener::with_value(&registry, format!("{id}/position"), position)?,
            point_of_interest: AnimListener::with_value(
                &registry,
                format!("{id}/point_of_interest"),
                point_of_interest,
            )?,
            up: AnimListener::with_value(&registry, format!("{id}/up"), up)?,
        };
        Ok(Self::from_kind(id, kind))
    }

    pub fn matrix(id: impl Into<String>, matrix: Mat4, evaluator: &Evaluator) -> Result<Self> {
        let id = id.into();
        let kind = TransformKind::Matrix {
            matrix: AnimListener::with_value(&evaluator.registry(), id.clone(), matrix)?,
        };
        Ok(Self::from_kind(id, kind))
    }

    /// Rotation of `angle` degrees around `axis`.
    pub fn rotate(id: impl Into<String>, axis: Vec3, angle: f32, evaluator: &Evaluator) -> Result<Self> {
        let id = id.into();
        let registry = evaluator.registry();
        let kind = TransformKind::Rotate {
            axis: AnimListener::with_value(&registry, format!("{id}/axis"), axis)?,
            angle: AnimListener::with_value(&registry, format!("{id}/angle"), angle)?,
        };
        Ok(Self::from_kind(id, kind))
    }

    pub fn scale(id: impl Into<String>, value: Vec3, evaluator: &Evaluator) -> Result<Self> {
        let id = id.into();
        let kind = TransformKind::Scale {
            value: AnimListener::with_value(&evaluator.registry(), id.clone(), value)?,
        };
        Ok(Self::from_kind(id, kind))
    }

    pub fn translate(id: impl Into<String>, value: Vec3, evaluator: &Evaluator) -> Result<Self> {
        let id = id.into();
        let kind = TransformKind::Translate {
            value: AnimListener::with_value(&evaluator.registry(), id.clone(), value)?,
        };
        Ok(Self::from_kind(id, kind))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &TransformKind {
        &self.kind
    }

    /// Builds the matrix from the current listener values.
    #[must_use]
    pub fn calculate_matrix(&self) -> Mat4 {
        match &self.kind {
            TransformKind::LookAt {
                position,
                point_of_interest,
                up,
            } => Mat4::look_at_rh(position.value(), point_of_interest.value(), up.value()).inverse(),
            TransformKind::Matrix { matrix } => matrix.value(),
            TransformKind::Rotate { axis, angle } => {
                let axis = axis.value().normalize_or_zero();
                if axis == Vec3::ZERO {
                    Mat4::IDENTITY
                } else {
                    Mat4::from_axis_angle(axis, angle.value().to_radians())
                }
            }
            TransformKind::Scale { value } => Mat4::from_scale(value.value()),
            TransformKind::Translate { value } => Mat4::from_translation(value.value()),
        }
    }

    /// Whether the cached matrix may be stale.
    ///
    /// Listener slots carry no change tracking, so every kind reports `true`.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        match self.kind {
            TransformKind::LookAt { .. }
            | TransformKind::Matrix { .. }
            | TransformKind::Rotate { .. }
            | TransformKind::Scale { .. }
            | TransformKind::Translate { .. } => true,
        }
    }

    /// Returns the matrix, recalculating it when it may be stale.
    pub fn get_matrix(&mut self) -> Mat4 {
        if self.has_changed() {
            self.matrix = self.calculate_matrix();
        }
        self.matrix
    }
}
