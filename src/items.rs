use gsviz::library::*;
use gsviz::timeline::{Drawn, Palette, Shape};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas, RenderTarget};
use sdl2::ttf::Font;
use sdl2::video::Window;

use crate::ViewerError;
use crate::axes::Axes;

const THIN: u8 = 3;
const THICK: u8 = 7;
const HEAD_LENGTH: f64 = 16.0;
const DASH: f64 = 8.0;
const GAP: f64 = 6.0;
/// Marker radius in scene units.
const MARKER_RADIUS: f64 = 0.04;
const PLANE_OPACITY: f64 = 0.25;
/// Pixels between a caption and the frame around it.
pub const CAPTION_PADDING: i32 = 10;

pub fn to_abgr(color: Color) -> Color {
    Color::RGBA(color.a, color.b, color.g, color.r)
}

pub fn palette_color(palette: Palette) -> Color {
    match palette {
        Palette::White => Color::RGB(255, 255, 255),
        Palette::Red => Color::RGB(252, 98, 85),
        Palette::Blue => Color::RGB(88, 196, 221),
        Palette::Green => Color::RGB(131, 193, 103),
        Palette::Yellow => Color::RGB(255, 255, 0),
        Palette::Purple => Color::RGB(154, 114, 172),
        Palette::Orange => Color::RGB(255, 134, 47),
    }
}

fn with_opacity(color: Color, opacity: f64) -> Color {
    let alpha = (color.a as f64 * opacity.clamp(0.0, 1.0)).round() as u8;
    Color::RGBA(color.r, color.g, color.b, alpha)
}

fn px(p: [f64; 2]) -> (i16, i16) {
    (p[0].round() as i16, p[1].round() as i16)
}

fn draw_arrow<T: RenderTarget>(
    canvas: &mut Canvas<T>,
    axes: &Axes,
    tip: Point<3>,
    width: u8,
    color: Color,
) -> Result<(), String> {
    let start = axes.c2s([0.0; 3]);
    let end = axes.c2s(tip);
    let vec = find_vector(start, end);
    let Ok(dir) = normalize(vec) else {
        return Ok(());
    };
    let head = HEAD_LENGTH.min(get_magnitude(vec) * 0.35);
    let normal = [-dir[1], dir[0]];
    let back = sub(end, scale(dir, head));
    let (x1, y1) = px(start);
    let (x2, y2) = px(back);
    canvas.thick_line(x1, y1, x2, y2, width, color)?;

    let half = head * 0.5 + width as f64 * 0.5;
    let (tx, ty) = px(end);
    let (lx, ly) = px(add(back, scale(normal, half)));
    let (rx, ry) = px(sub(back, scale(normal, half)));
    canvas.filled_trigon(tx, ty, lx, ly, rx, ry, color)
}

fn draw_dashed<T: RenderTarget>(
    canvas: &mut Canvas<T>,
    start: [f64; 2],
    end: [f64; 2],
    color: Color,
) -> Result<(), String> {
    let vec = find_vector(start, end);
    let length = get_magnitude(vec);
    let Ok(dir) = normalize(vec) else {
        return Ok(());
    };
    let mut along = 0.0;
    while along < length {
        let (x1, y1) = px(add(start, scale(dir, along)));
        let (x2, y2) = px(add(start, scale(dir, (along + DASH).min(length))));
        canvas.thick_line(x1, y1, x2, y2, 2, color)?;
        along += DASH + GAP;
    }
    Ok(())
}

pub fn draw_text(
    canvas: &mut Canvas<Window>,
    font: &Font,
    text: &str,
    (x, y): (i32, i32),
    color: Color,
    opacity: f64,
) -> Result<(), ViewerError> {
    let surface = font.render(text).blended(color).map_err(|e| e.to_string())?;
    let texture_creator = canvas.texture_creator();
    let mut texture = texture_creator
        .create_texture_from_surface(&surface)
        .map_err(|e| e.to_string())?;
    texture.set_blend_mode(BlendMode::Blend);
    texture.set_alpha_mod((opacity.clamp(0.0, 1.0) * 255.0).round() as u8);
    let query = texture.query();
    canvas.copy(&texture, None, Some(Rect::new(x, y, query.width, query.height)))?;
    Ok(())
}

/// Frame around the captions, sized once for the widest of them.
pub fn draw_caption_frame<T: RenderTarget>(
    canvas: &mut Canvas<T>,
    frame: Rect,
) -> Result<(), String> {
    canvas.rectangle(
        frame.left() as i16,
        frame.top() as i16,
        frame.right() as i16,
        frame.bottom() as i16,
        to_abgr(Color::WHITE),
    )
}

/// Draws one item of the current frame.
pub fn draw(
    canvas: &mut Canvas<Window>,
    axes: &Axes,
    font: &Font,
    caption_at: (i32, i32),
    drawn: &Drawn,
) -> Result<(), ViewerError> {
    let opacity = drawn.opacity;
    match &drawn.shape {
        Shape::Arrow { tip, color, thick } => {
            let width = if *thick { THICK } else { THIN };
            let color = to_abgr(with_opacity(palette_color(*color), opacity));
            draw_arrow(canvas, axes, *tip, width, color)?;
        }
        Shape::Line { start, end, color, dashed } => {
            let color = to_abgr(with_opacity(palette_color(*color), opacity));
            let (start, end) = (axes.c2s(*start), axes.c2s(*end));
            if *dashed {
                draw_dashed(canvas, start, end, color)?;
            } else {
                let ((x1, y1), (x2, y2)) = (px(start), px(end));
                canvas.thick_line(x1, y1, x2, y2, 2, color)?;
            }
        }
        Shape::Elbow { glyph, color } => {
            let color = to_abgr(with_opacity(palette_color(*color), opacity));
            for segment in &glyph.segments {
                let (x1, y1) = axes.c2p(segment.start);
                let (x2, y2) = axes.c2p(segment.end);
                canvas.thick_line(x1, y1, x2, y2, 2, color)?;
            }
            let (mx, my) = axes.c2p(glyph.marker);
            let radius = ((axes.unit() * MARKER_RADIUS).round() as i16).max(2);
            canvas.filled_circle(mx, my, radius, color)?;
        }
        Shape::Plane { corners, color } => {
            let base = palette_color(*color);
            let points: Vec<(i16, i16)> = corners.iter().map(|c| axes.c2p(*c)).collect();
            let vx: Vec<i16> = points.iter().map(|p| p.0).collect();
            let vy: Vec<i16> = points.iter().map(|p| p.1).collect();
            canvas.filled_polygon(&vx, &vy, to_abgr(with_opacity(base, opacity * PLANE_OPACITY)))?;
            canvas.aa_polygon(&vx, &vy, to_abgr(with_opacity(base, opacity * 0.6)))?;
        }
        Shape::Label { text, anchor, color } => {
            let (x, y) = axes.c2p(*anchor);
            let at = (x as i32, y as i32 - 12);
            draw_text(canvas, font, text, at, palette_color(*color), opacity)?;
        }
        Shape::Caption { text } => {
            draw_text(canvas, font, text, caption_at, Color::WHITE, opacity)?;
        }
    }
    Ok(())
}
