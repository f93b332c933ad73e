/// Painter's-algorithm mesh rendering onto a 2D canvas
use nalgebra::Matrix4;
use shopsy_core::lighting::shade_triangle;
use shopsy_core::{Camera, CheckerTexture, Mesh, PointLight, ScreenPoint};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#000000";

/// A projected, shaded triangle ready to fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub points: [ScreenPoint; 3],
    pub brightness: f32,
}

impl Face {
    fn depth(&self) -> f32 {
        self.points.iter().map(|p| p.depth).sum::<f32>() / 3.0
    }
}

/// Project every visible triangle, sorted back to front
pub fn project_faces(
    mesh: &Mesh,
    model: &Matrix4<f32>,
    camera: &Camera,
    light: &PointLight,
    texture: &CheckerTexture,
    width: u32,
    height: u32,
) -> Vec<Face> {
    let view_projection = camera.view_projection();
    let mut faces: Vec<Face> = mesh
        .triangles
        .iter()
        .filter_map(|triangle| {
            let project = |i: usize| {
                let world = model.transform_point(&triangle.vertices[i].position);
                camera.project_to_screen(&view_projection, &world, width, height)
            };
            let points = [project(0)?, project(1)?, project(2)?];

            // Screen Y points down, so front faces wind clockwise here
            let area = (points[1].x - points[0].x) * (points[2].y - points[0].y)
                - (points[2].x - points[0].x) * (points[1].y - points[0].y);
            if area >= 0.0 {
                return None;
            }

            Some(Face {
                points,
                brightness: shade_triangle(triangle, model, light, texture),
            })
        })
        .collect();

    faces.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
    faces
}

/// CSS color for a grey level in `[0, 1]`
pub fn shade_color(brightness: f32) -> String {
    let level = if brightness.is_nan() { 0.0 } else { brightness.clamp(0.0, 1.0) };
    let v = (level * 255.0).round() as u8;
    format!("rgb({},{},{})", v, v, v)
}

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self { canvas, context })
    }

    /// Match the drawing buffer to the displayed size; returns it
    pub fn fit_to_display(&self) -> (u32, u32) {
        let width = self.canvas.client_width().max(1) as u32;
        let height = self.canvas.client_height().max(1) as u32;
        if self.canvas.width() != width || self.canvas.height() != height {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
        (width, height)
    }

    pub fn render(&self, faces: &[Face]) {
        let width = self.canvas.width() as f64;
        let height = self.canvas.height() as f64;

        self.context.set_fill_style_str(BACKGROUND);
        self.context.fill_rect(0.0, 0.0, width, height);

        for face in faces {
            let color = shade_color(face.brightness);
            self.context.set_fill_style_str(&color);
            self.context.set_stroke_style_str(&color);
            self.context.begin_path();
            let [a, b, c] = face.points;
            self.context.move_to(a.x as f64, a.y as f64);
            self.context.line_to(b.x as f64, b.y as f64);
            self.context.line_to(c.x as f64, c.y as f64);
            self.context.close_path();
            self.context.fill();
            // Hide hairline seams between adjacent triangles
            self.context.stroke();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn test_shade_color() {
        assert_eq!(shade_color(0.0), "rgb(0,0,0)");
        assert_eq!(shade_color(1.0), "rgb(255,255,255)");
        assert_eq!(shade_color(2.0), "rgb(255,255,255)");
        assert_eq!(shade_color(f32::NAN), "rgb(0,0,0)");
    }

    #[test]
    fn test_cube_shows_front_face_only() {
        let faces = project_faces(
            &Mesh::cube(1.0, 1),
            &Matrix4::identity(),
            &Camera::new(800, 600),
            &PointLight::new(Vector3::new(0.0, 0.0, 5.0)),
            &CheckerTexture::default(),
            800,
            600,
        );
        // Looking straight down -Z only the +Z face is visible
        assert_eq!(faces.len(), 2);
        assert!(faces.iter().all(|face| face.brightness > 0.5));
    }

    #[test]
    fn test_faces_sorted_back_to_front() {
        let model = shopsy_core::Transform {
            rotation: Vector3::new(0.4, 0.7, 0.0),
            ..shopsy_core::Transform::identity()
        }
        .model_matrix();
        let faces = project_faces(
            &Mesh::cube(1.0, 2),
            &model,
            &Camera::new(800, 600),
            &PointLight::new(Vector3::new(0.0, 0.0, 5.0)),
            &CheckerTexture::default(),
            800,
            600,
        );
        assert!(faces.len() > 8);
        for pair in faces.windows(2) {
            assert!(pair[0].depth() >= pair[1].depth());
        }
    }
}
