use gsviz::library::*;
use gsviz::scene::{AxesSpec, Camera};
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::pixels::Color;
use sdl2::render::{Canvas, RenderTarget};

use crate::items::to_abgr;

/// Share of the window the longest axis may cover.
const FILL: f64 = 0.85;
const TICK: f64 = 4.0;
const TIP: f64 = 10.0;
const AXIS_COLOR: Color = Color::RGB(160, 160, 160);

/// Maps scene coordinates to window pixels and draws the coordinate axes.
pub struct Axes {
    spec: AxesSpec,
    camera: Camera,
    unit: f64,
    center: [f64; 2],
}

impl Axes {
    pub fn new(spec: AxesSpec, camera: Camera, window_width: u32, window_height: u32) -> Axes {
        let span_x = spec.x_range[1] - spec.x_range[0];
        let span_y = spec.y_range[1] - spec.y_range[0];
        let unit = (window_width as f64 * FILL / span_x).min(window_height as f64 * FILL / span_y);
        Axes {
            spec,
            camera,
            unit,
            center: [window_width as f64 / 2.0, window_height as f64 / 2.0],
        }
    }

    /// Pixel size of one scene unit before the camera zoom.
    pub fn unit(&self) -> f64 {
        self.unit
    }

    /// Window position of a scene point, y growing downwards.
    pub fn c2s(&self, p: Point<3>) -> [f64; 2] {
        let [x, y] = self.camera.project(p);
        [self.center[0] + x * self.unit, self.center[1] - y * self.unit]
    }

    pub fn c2p(&self, p: Point<3>) -> (i16, i16) {
        let [x, y] = self.c2s(p);
        (x.round() as i16, y.round() as i16)
    }

    fn ranges(&self) -> Vec<(&'static str, usize, [f64; 2])> {
        let mut ranges = vec![("x", 0, self.spec.x_range), ("y", 1, self.spec.y_range)];
        if let Some(z_range) = self.spec.z_range {
            ranges.push(("z", 2, z_range));
        }
        ranges
    }

    /// Where the x, y (and z) labels go, just past each axis tip.
    pub fn labels(&self) -> Vec<(&'static str, (i32, i32))> {
        self.ranges()
            .into_iter()
            .map(|(name, axis, range)| {
                let mut tip = [0.0; 3];
                tip[axis] = range[1] * 1.06;
                let (x, y) = self.c2p(tip);
                (name, (x as i32, y as i32))
            })
            .collect()
    }

    pub fn draw<T: RenderTarget>(&self, canvas: &mut Canvas<T>) -> Result<(), String> {
        let color = to_abgr(AXIS_COLOR);
        for (_, axis, range) in self.ranges() {
            let mut lo = [0.0; 3];
            let mut hi = [0.0; 3];
            lo[axis] = range[0];
            hi[axis] = range[1];
            let (start, end) = (self.c2s(lo), self.c2s(hi));
            canvas.line(start[0] as i16, start[1] as i16, end[0] as i16, end[1] as i16, color)?;

            // Seen end-on, an axis has no screen direction to tick along.
            let Ok(dir) = normalize(find_vector(start, end)) else {
                continue;
            };
            let normal = [-dir[1], dir[0]];
            let mut tick = range[0].ceil();
            while tick <= range[1] {
                if tick != 0.0 {
                    let mut p = [0.0; 3];
                    p[axis] = tick;
                    let at = self.c2s(p);
                    let a = add(at, scale(normal, TICK));
                    let b = sub(at, scale(normal, TICK));
                    canvas.line(a[0] as i16, a[1] as i16, b[0] as i16, b[1] as i16, color)?;
                }
                tick += 1.0;
            }

            let back = sub(end, scale(dir, TIP));
            let left = add(back, scale(normal, TIP / 2.0));
            let right = sub(back, scale(normal, TIP / 2.0));
            canvas.filled_trigon(
                end[0] as i16,
                end[1] as i16,
                left[0] as i16,
                left[1] as i16,
                right[0] as i16,
                right[1] as i16,
                color,
            )?;
        }
        Ok(())
    }
}
