/// Flat shading from a single point light plus ambient fill
use nalgebra::{Matrix4, Point2, Point3, Vector3};

use crate::geometry::Triangle;

/// Ambient contribution added to every face
pub const AMBIENT: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vector3<f32>,
    pub intensity: f32,
}

impl PointLight {
    pub fn new(position: Vector3<f32>) -> Self {
        Self {
            position,
            intensity: 1.0,
        }
    }
}

/// Two-tone checker pattern sampled by UV
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckerTexture {
    pub tiles: u32,
    pub light: f32,
    pub dark: f32,
}

impl CheckerTexture {
    pub fn sample(&self, uv: Point2<f32>) -> f32 {
        let tiles = self.tiles.max(1) as f32;
        let u = (uv.x.clamp(0.0, 0.9999) * tiles) as u32;
        let v = (uv.y.clamp(0.0, 0.9999) * tiles) as u32;
        if (u + v) % 2 == 0 {
            self.light
        } else {
            self.dark
        }
    }
}

impl Default for CheckerTexture {
    fn default() -> Self {
        Self {
            tiles: 4,
            light: 1.0,
            dark: 0.6,
        }
    }
}

/// Brightness in `[0, 1]` of a triangle after the model transform
pub fn shade_triangle(
    triangle: &Triangle,
    model: &Matrix4<f32>,
    light: &PointLight,
    texture: &CheckerTexture,
) -> f32 {
    let centroid = model.transform_point(&triangle.centroid());
    let a = model.transform_point(&triangle.vertices[0].position);
    let b = model.transform_point(&triangle.vertices[1].position);
    let c = model.transform_point(&triangle.vertices[2].position);
    let normal = (b - a).cross(&(c - a));

    let albedo = texture.sample(triangle.centroid_uv());
    let diffuse = lambert(&normal, &centroid, &light.position) * light.intensity;
    ((AMBIENT + diffuse) * albedo).clamp(0.0, 1.0)
}

/// Lambert term for a surface facing `normal` at `point`
pub fn lambert(normal: &Vector3<f32>, point: &Point3<f32>, light: &Vector3<f32>) -> f32 {
    let to_light = light - point.coords;
    let (Some(n), Some(l)) = (normal.try_normalize(1e-9), to_light.try_normalize(1e-9)) else {
        return 0.0;
    };
    n.dot(&l).max(0.0)
}
