use nalgebra::{Matrix4, Vector3};

/// A homogeneous 4x4 transform. Composition is right-multiplication, so each
/// step applies in the local frame built up by the previous ones.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose(Matrix4<f32>);

impl Default for Pose {
    fn default() -> Self {
        Pose::identity()
    }
}

impl Pose {
    pub fn identity() -> Self {
        Pose(Matrix4::identity())
    }

    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Pose(Matrix4::new_translation(&Vector3::new(x, y, z)))
    }

    pub fn rotation_x(angle: f32) -> Self {
        Pose(Matrix4::from_axis_angle(&Vector3::x_axis(), angle))
    }

    pub fn rotation_y(angle: f32) -> Self {
        Pose(Matrix4::from_axis_angle(&Vector3::y_axis(), angle))
    }

    pub fn rotation_z(angle: f32) -> Self {
        Pose(Matrix4::from_axis_angle(&Vector3::z_axis(), angle))
    }

    pub fn scale(x: f32, y: f32, z: f32) -> Self {
        Pose(Matrix4::new_nonuniform_scaling(&Vector3::new(x, y, z)))
    }

    pub fn times(&self, other: &Pose) -> Pose {
        Pose(self.0 * other.0)
    }

    pub fn translated(&self, x: f32, y: f32, z: f32) -> Pose {
        self.times(&Pose::translation(x, y, z))
    }

    pub fn rotated_y(&self, angle: f32) -> Pose {
        self.times(&Pose::rotation_y(angle))
    }

    pub fn scaled(&self, x: f32, y: f32, z: f32) -> Pose {
        self.times(&Pose::scale(x, y, z))
    }

    /// World-space origin of the pose (the translation column).
    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.0[(0, 3)], self.0[(1, 3)], self.0[(2, 3)])
    }

    pub fn x(&self) -> f32 {
        self.0[(0, 3)]
    }

    pub fn z(&self) -> f32 {
        self.0[(2, 3)]
    }

    pub fn matrix(&self) -> &Matrix4<f32> {
        &self.0
    }

    /// Inverse transform, used to turn a camera pose into a view matrix.
    pub fn inverse(&self) -> Option<Pose> {
        self.0.try_inverse().map(Pose)
    }
}
