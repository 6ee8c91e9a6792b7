/// ASCII rasterizer for terminal rendering of indexed meshes
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use lathe_core::Mesh;
use nalgebra::{Matrix4, Vector3};
use std::io::Write;

use crate::camera::Camera;
use crate::scene::DisplayMode;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light direction in view space (towards the viewer, slightly from above)
const LIGHT: [f32; 3] = [0.3, 0.5, 1.0];

/// A projected vertex: screen position, depth and lighting input
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    normal: Vector3<f32>,
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    light: Vector3<f32>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            light: Vector3::from(LIGHT).normalize(),
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    /// Character at cell `(x, y)`
    pub fn cell(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
        mode: DisplayMode,
    ) {
        let mvp = camera.mvp_matrix(model_matrix);
        let normal_matrix = camera.view_matrix() * model_matrix;

        // Project every vertex once; indices refer into this buffer
        let projected: Vec<Option<ScreenVertex>> = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .map(|(position, normal)| {
                let (x, y, depth) = camera.project_to_screen(
                    position,
                    &mvp,
                    self.width as u32,
                    self.height as u32,
                )?;
                let normal = normal_matrix
                    .transform_vector(normal)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::z);
                Some(ScreenVertex {
                    x,
                    y,
                    depth,
                    normal,
                })
            })
            .collect();

        for triangle in mesh.indices.chunks_exact(3) {
            let corners = [
                projected[triangle[0] as usize],
                projected[triangle[1] as usize],
                projected[triangle[2] as usize],
            ];
            // Triangle is clipped
            let [Some(a), Some(b), Some(c)] = corners else {
                continue;
            };

            match mode {
                DisplayMode::Wireframe => {
                    self.draw_line(&a, &b);
                    self.draw_line(&b, &c);
                    self.draw_line(&c, &a);
                }
                DisplayMode::Shaded | DisplayMode::Normals => {
                    self.rasterize_triangle(&[a, b, c], mode);
                }
            }
        }
    }

    fn rasterize_triangle(&mut self, v: &[ScreenVertex; 3], mode: DisplayMode) {
        // Bounding box
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor() as i32;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil() as i32;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor() as i32;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v[0].x, v[0].y), (v[1].x, v[1].y), (v[2].x, v[2].y), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                let idx = y as usize * self.width + x as usize;
                if depth >= self.depth_buffer[idx] {
                    continue;
                }

                let normal = (v[0].normal * w0 + v[1].normal * w1 + v[2].normal * w2)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3::z);
                let (character, color) = match mode {
                    DisplayMode::Normals => normal_glyph(&normal),
                    _ => self.shade(&normal),
                };

                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = character;
                self.color_buffer[idx] = color;
            }
        }
    }

    /// Lambert term mapped onto the luminosity ramp
    fn shade(&self, normal: &Vector3<f32>) -> (char, Color) {
        let brightness = normal.dot(&self.light).max(0.0);
        let index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
        let character = LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)];

        // Color based on character intensity
        let color = match index {
            0..=2 => Color::DarkGrey,
            3..=4 => Color::Grey,
            5..=6 => Color::White,
            _ => Color::Cyan,
        };
        (character, color)
    }

    /// Draw an edge, depth-tested against filled cells only
    fn draw_line(&mut self, a: &ScreenVertex, b: &ScreenVertex) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0);
        // Guard against edges projected absurdly far off screen
        if steps > 4.0 * (self.width + self.height) as f32 {
            return;
        }

        let steps = steps as usize;
        for step in 0..=steps {
            let s = step as f32 / steps as f32;
            let x = a.x + (b.x - a.x) * s;
            let y = a.y + (b.y - a.y) * s;
            if x < 0.0 || y < 0.0 {
                continue;
            }

            let (x, y) = (x as usize, y as usize);
            if x >= self.width || y >= self.height {
                continue;
            }

            let idx = y * self.width + x;
            let depth = a.depth + (b.depth - a.depth) * s;
            if depth < self.depth_buffer[idx] {
                self.depth_buffer[idx] = depth;
                self.char_buffer[idx] = edge_glyph(b.x - a.x, b.y - a.y);
                self.color_buffer[idx] = Color::White;
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = Color::Reset;
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if color != current {
                    writer.queue(SetForegroundColor(color))?;
                    current = color;
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Glyph for a line segment by its slope in screen cells
fn edge_glyph(dx: f32, dy: f32) -> char {
    // Cells are twice as tall as wide
    let angle = (-dy * 2.0).atan2(dx).to_degrees().rem_euclid(180.0);
    match angle {
        a if !(22.5..157.5).contains(&a) => '-',
        a if a < 67.5 => '/',
        a if a < 112.5 => '|',
        _ => '\\',
    }
}

/// Glyph and colour for the dominant axis of a view-space normal
fn normal_glyph(normal: &Vector3<f32>) -> (char, Color) {
    let (axis, value) = normal
        .iter()
        .enumerate()
        .fold((0, 0.0f32), |best, (axis, &value)| {
            if value.abs() > best.1.abs() {
                (axis, value)
            } else {
                best
            }
        });

    let positive = value >= 0.0;
    match (axis, positive) {
        (0, true) => ('x', Color::Red),
        (0, false) => ('x', Color::DarkRed),
        (1, true) => ('y', Color::Green),
        (1, false) => ('y', Color::DarkGreen),
        (_, true) => ('z', Color::Blue),
        (_, false) => ('z', Color::DarkBlue),
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
