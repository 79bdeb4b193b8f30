use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

/// A value that can live in a listener slot.
///
/// Slots store flat `f32` arrays; this trait marshals typed values to and
/// from them. `COMPONENTS` fixes the slot size a listener of this type binds.
pub trait ListenerValue: Copy + Sized {
    const COMPONENTS: usize;

    /// Writes the components into `out[..COMPONENTS]`.
    fn write_to(&self, out: &mut [f32]);

    /// Builds a value from `src[..COMPONENTS]`.
    fn read_from(src: &[f32]) -> Self;

    /// The all-zero value, returned when a slot is no longer available.
    fn zeroed() -> Self;
}

impl ListenerValue for f32 {
    const COMPONENTS: usize = 1;

    fn write_to(&self, out: &mut [f32]) {
        out[0] = *self;
    }

    fn read_from(src: &[f32]) -> Self {
        src[0]
    }

    fn zeroed() -> Self {
        0.0
    }
}

impl ListenerValue for Vec2 {
    const COMPONENTS: usize = 2;

    fn write_to(&self, out: &mut [f32]) {
        out[..2].copy_from_slice(&self.to_array());
    }

    fn read_from(src: &[f32]) -> Self {
        Vec2::from_slice(src)
    }

    fn zeroed() -> Self {
        Vec2::ZERO
    }
}

impl ListenerValue for Vec3 {
    const COMPONENTS: usize = 3;

    fn write_to(&self, out: &mut [f32]) {
        out[..3].copy_from_slice(&self.to_array());
    }

    fn read_from(src: &[f32]) -> Self {
        Vec3::from_slice(src)
    }

    fn zeroed() -> Self {
        Vec3::ZERO
    }
}

impl ListenerValue for Vec4 {
    const COMPONENTS: usize = 4;

    fn write_to(&self, out: &mut [f32]) {
        out[..4].copy_from_slice(&self.to_array());
    }

    fn read_from(src: &[f32]) -> Self {
        Vec4::from_slice(src)
    }

    fn zeroed() -> Self {
        Vec4::ZERO
    }
}

// Stored as (x, y, z, w), not normalized on read.
impl ListenerValue for Quat {
    const COMPONENTS: usize = 4;

    fn write_to(&self, out: &mut [f32]) {
        out[..4].copy_from_slice(&self.to_array());
    }

    fn read_from(src: &[f32]) -> Self {
        Quat::from_slice(src)
    }

    fn zeroed() -> Self {
        Quat::from_xyzw(0.0, 0.0, 0.0, 0.0)
    }
}

// Column-major, matching `Mat4::to_cols_array`.
impl ListenerValue for Mat4 {
    const COMPONENTS: usize = 16;

    fn write_to(&self, out: &mut [f32]) {
        out[..16].copy_from_slice(&self.to_cols_array());
    }

    fn read_from(src: &[f32]) -> Self {
        Mat4::from_cols_slice(src)
    }

    fn zeroed() -> Self {
        Mat4::ZERO
    }
}
