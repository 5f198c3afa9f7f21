use std::path::Path;

use image::{ImageFormat, Rgb, RgbImage};
use log::info;

use crate::{
    error::TestImageError,
    font::{self, ADVANCE, GLYPH_HEIGHT, GLYPH_WIDTH},
};

pub const WIDTH: u32 = 400;
pub const HEIGHT: u32 = 300;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);

pub const TITLE: &str = "Test Image";
pub const CAPTION: &str = "Shapes: Rectangle, Circle, Triangle";

const OUTLINE_WIDTH: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    BlueRectangle,
    RedCircle,
    GreenTriangle,
    TextLabels,
}

impl Element {
    pub fn describe(self) -> &'static str {
        match self {
            Element::BlueRectangle => "blue rectangle",
            Element::RedCircle => "red circle",
            Element::GreenTriangle => "green triangle",
            Element::TextLabels => "text labels",
        }
    }
}

/// Draws the fixed validation picture. `on_element` is called after each
/// element lands on the canvas.
pub fn render_test_image(mut on_element: impl FnMut(Element)) -> RgbImage {
    let mut img = RgbImage::from_pixel(WIDTH, HEIGHT, WHITE);

    draw_rectangle(&mut img, (50, 50), (150, 100), BLUE);
    on_element(Element::BlueRectangle);

    draw_ellipse(&mut img, (200, 50), (300, 150), RED);
    on_element(Element::RedCircle);

    draw_triangle(&mut img, [(100, 200), (150, 250), (50, 250)], GREEN);
    on_element(Element::GreenTriangle);

    draw_text(&mut img, (50, 10), TITLE, BLACK);
    draw_text(&mut img, (50, 270), CAPTION, BLACK);
    on_element(Element::TextLabels);

    img
}

pub fn create_test_image(
    output_path: &Path,
    on_element: impl FnMut(Element),
) -> Result<RgbImage, TestImageError> {
    info!("creating test image at {}", output_path.display());
    let img = render_test_image(on_element);
    img.save_with_format(output_path, ImageFormat::Png)?;
    Ok(img)
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

// Corners are inclusive; the outline is drawn inside the box.
fn draw_rectangle(img: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), fill: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            let on_edge = x - x0 < OUTLINE_WIDTH
                || x1 - x < OUTLINE_WIDTH
                || y - y0 < OUTLINE_WIDTH
                || y1 - y < OUTLINE_WIDTH;
            put(img, x, y, if on_edge { BLACK } else { fill });
        }
    }
}

fn draw_ellipse(img: &mut RgbImage, (x0, y0): (i32, i32), (x1, y1): (i32, i32), fill: Rgb<u8>) {
    let cx = (x0 + x1) as f32 / 2.0;
    let cy = (y0 + y1) as f32 / 2.0;
    let rx = (x1 - x0) as f32 / 2.0;
    let ry = (y1 - y0) as f32 / 2.0;
    let inner_rx = rx - OUTLINE_WIDTH as f32;
    let inner_ry = ry - OUTLINE_WIDTH as f32;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if (dx / rx).powi(2) + (dy / ry).powi(2) > 1.0 {
                continue;
            }
            let inside_outline = (dx / inner_rx).powi(2) + (dy / inner_ry).powi(2) <= 1.0;
            put(img, x, y, if inside_outline { fill } else { BLACK });
        }
    }
}

fn edge_side(a: (f32, f32), b: (f32, f32), p: (f32, f32)) -> f32 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

fn segment_distance(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (abx, aby) = (b.0 - a.0, b.1 - a.1);
    let length_sq = abx * abx + aby * aby;
    let t = if length_sq == 0.0 {
        0.0
    } else {
        (((p.0 - a.0) * abx + (p.1 - a.1) * aby) / length_sq).clamp(0.0, 1.0)
    };
    let (qx, qy) = (a.0 + t * abx, a.1 + t * aby);
    ((p.0 - qx).powi(2) + (p.1 - qy).powi(2)).sqrt()
}

fn draw_triangle(img: &mut RgbImage, points: [(i32, i32); 3], fill: Rgb<u8>) {
    let corners = points.map(|(x, y)| (x as f32, y as f32));
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[0]),
    ];
    let min_x = points.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = points.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.1).max().unwrap_or(0);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = (x as f32, y as f32);
            let sides = edges.map(|(a, b)| edge_side(a, b, p));
            let inside = sides.iter().all(|s| *s >= 0.0) || sides.iter().all(|s| *s <= 0.0);
            if !inside {
                continue;
            }
            let on_outline = edges
                .iter()
                .any(|(a, b)| segment_distance(p, *a, *b) < OUTLINE_WIDTH as f32);
            put(img, x, y, if on_outline { BLACK } else { fill });
        }
    }
}

fn draw_text(img: &mut RgbImage, (x, y): (i32, i32), text: &str, color: Rgb<u8>) {
    for (index, ch) in text.chars().enumerate() {
        let Some(rows) = font::glyph(ch) else {
            continue;
        };
        let origin_x = x + (index as u32 * ADVANCE) as i32;
        for gy in 0..GLYPH_HEIGHT {
            for gx in 0..GLYPH_WIDTH {
                if font::is_set(&rows, gx, gy) {
                    put(img, origin_x + gx as i32, y + gy as i32, color);
                }
            }
        }
    }
}
