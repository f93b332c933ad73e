/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use shopsy_core::lighting::shade_triangle;
use shopsy_core::{Camera, CheckerTexture, Mesh, PointLight, ScreenPoint};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Glyph drawn where the point light projects onto the screen
const LIGHT_MARKER: char = 'O';

/// ASCII renderer that converts lit meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model: &Matrix4<f32>,
        camera: &Camera,
        light: &PointLight,
        texture: &CheckerTexture,
    ) {
        let view_projection = camera.view_projection();
        let (width, height) = (self.width as u32, self.height as u32);

        for triangle in &mesh.triangles {
            let mut screen = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 }; 3];
            let mut visible = true;
            for (slot, vertex) in screen.iter_mut().zip(&triangle.vertices) {
                let world = model.transform_point(&vertex.position);
                match camera.project_to_screen(&view_projection, &world, width, height) {
                    Some(point) => *slot = point,
                    None => {
                        visible = false;
                        break;
                    }
                }
            }
            if !visible {
                continue;
            }

            let brightness = shade_triangle(triangle, model, light, texture);
            self.rasterize_triangle(&screen, glyph_for(brightness));
        }
    }

    /// Draw the light marker on top of the scene when it is in view
    pub fn mark_light(&mut self, camera: &Camera, light: &PointLight) {
        let view_projection = camera.view_projection();
        let position = Point3::from(light.position);
        let (width, height) = (self.width as u32, self.height as u32);
        let Some(point) = camera.project_to_screen(&view_projection, &position, width, height)
        else {
            return;
        };

        let (x, y) = (point.x as usize, point.y as usize);
        if x < self.width && y < self.height {
            self.char_buffer[y * self.width + x] = LIGHT_MARKER;
        }
    }

    fn rasterize_triangle(&mut self, points: &[ScreenPoint; 3], character: char) {
        let [v0, v1, v2] = *points;

        let min_x = v0.x.min(v1.x).min(v2.x).floor().max(0.0) as i32;
        let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i32).min(self.width as i32 - 1);
        let min_y = v0.y.min(v1.y).min(v2.y).floor().max(0.0) as i32;
        let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i32).min(self.height as i32 - 1);
        let (a, b, c) = ((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y));

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                let Some((w0, w1, w2)) = barycentric(a, b, c, p) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for row in self.char_buffer.chunks(self.width.max(1)) {
            for &c in row {
                writer.queue(SetForegroundColor(color_for(c)))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print("\r\n"))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }

    #[cfg(test)]
    fn glyph_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }
}

fn glyph_for(brightness: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (brightness.clamp(0.0, 1.0) * last as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

fn color_for(c: char) -> Color {
    match c {
        LIGHT_MARKER => Color::Yellow,
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        _ => Color::Cyan,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
