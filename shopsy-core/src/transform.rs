/// Rendered object transform and the matrices built from it
use nalgebra::{Matrix4, Vector3};

/// Live transform of an object in the scene.
///
/// Rotation is a set of absolute Euler angles applied in X, Y, Z order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            translation: Vector3::zeros(),
            rotation: Vector3::zeros(),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Rotation matrix for intrinsic X, Y, Z Euler angles (`Rx * Ry * Rz`)
    pub fn rotation_matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, self.rotation.z));

        rx * ry * rz
    }

    pub fn translation_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_translation(&self.translation)
    }

    pub fn scale_matrix(&self) -> Matrix4<f32> {
        Matrix4::new_nonuniform_scaling(&self.scale)
    }

    /// Object-to-world matrix: scale, then rotate, then translate
    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.translation_matrix() * self.rotation_matrix() * self.scale_matrix()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
