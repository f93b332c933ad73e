/// Mesh primitives for the displayed object
use nalgebra::{Point2, Point3, Vector3};

/// A vertex with position, normal and texture coordinate
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub uv: Point2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, uv: Point2<f32>) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Face normal from counter-clockwise winding
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [a, b, c] = self.vertices.map(|v| v.position);
        (b - a).cross(&(c - a)).normalize()
    }

    pub fn centroid(&self) -> Point3<f32> {
        let [a, b, c] = self.vertices.map(|v| v.position.coords);
        Point3::from((a + b + c) / 3.0)
    }

    pub fn centroid_uv(&self) -> Point2<f32> {
        let [a, b, c] = self.vertices.map(|v| v.uv.coords);
        Point2::from((a + b + c) / 3.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

/// Outward normal plus two in-plane axes with `u x v == normal`
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
];

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    /// Axis-aligned cube centred on the origin, each face split into
    /// `divisions x divisions` quads with UVs spanning `[0, 1]`
    pub fn cube(size: f32, divisions: usize) -> Self {
        let half = size / 2.0;
        let divisions = divisions.max(1);
        let step = 1.0 / divisions as f32;
        let mut mesh = Self::new();

        for (normal, u_axis, v_axis) in CUBE_FACES {
            let normal = Vector3::from(normal);
            let u_axis = Vector3::from(u_axis);
            let v_axis = Vector3::from(v_axis);

            let corner = |s: f32, t: f32| {
                let position = normal * half
                    + u_axis * ((s * 2.0 - 1.0) * half)
                    + v_axis * ((t * 2.0 - 1.0) * half);
                Vertex::new(Point3::from(position), normal, Point2::new(s, t))
            };

            for row in 0..divisions {
                for col in 0..divisions {
                    let (s0, t0) = (col as f32 * step, row as f32 * step);
                    let (s1, t1) = (s0 + step, t0 + step);
                    let (a, b) = (corner(s0, t0), corner(s1, t0));
                    let (c, d) = (corner(s1, t1), corner(s0, t1));
                    mesh.add_triangle(Triangle::new(a, b, c));
                    mesh.add_triangle(Triangle::new(a, c, d));
                }
            }
        }

        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_triangle_count() {
        assert_eq!(Mesh::cube(2.0, 1).triangles.len(), 12);
        assert_eq!(Mesh::cube(2.0, 3).triangles.len(), 108);
        assert_eq!(Mesh::cube(2.0, 0).triangles.len(), 12);
    }

    #[test]
    fn test_cube_winding_faces_outward() {
        let mesh = Mesh::cube(2.0, 2);
        for triangle in &mesh.triangles {
            let face = triangle.calculate_normal();
            let stored = triangle.vertices[0].normal;
            assert!((face - stored).norm() < 1e-5, "{:?} vs {:?}", face, stored);
            assert!(face.dot(&triangle.centroid().coords) > 0.0);
        }
    }

    #[test]
    fn test_cube_extent_and_uvs() {
        let mesh = Mesh::cube(3.0, 2);
        for triangle in &mesh.triangles {
            for vertex in &triangle.vertices {
                assert!(vertex.position.coords.amax() <= 1.5 + 1e-6);
                assert!((0.0..=1.0).contains(&vertex.uv.x));
                assert!((0.0..=1.0).contains(&vertex.uv.y));
            }
        }
    }
}
