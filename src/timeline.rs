//! Shapes scheduled over time, and the frame they make at any instant.

use crate::elbow::ElbowGlyph;
use crate::library::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Palette {
    White,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
}

/// Anything a scene can put on screen, in 3D scene coordinates. 2D scenes
/// live in the `z = 0` plane.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Vector drawn from the origin.
    Arrow {
        tip: Point<3>,
        color: Palette,
        thick: bool,
    },
    Line {
        start: Point<3>,
        end: Point<3>,
        color: Palette,
        dashed: bool,
    },
    Elbow {
        glyph: ElbowGlyph<3>,
        color: Palette,
    },
    /// Translucent quad, corners in drawing order.
    Plane {
        corners: [Point<3>; 4],
        color: Palette,
    },
    Label {
        text: String,
        anchor: Point<3>,
        color: Palette,
    },
    /// Step description, fixed to the frame rather than the scene.
    Caption { text: String },
}

pub type ItemId = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Draws the item progressively: arrows and lines grow from their start,
    /// everything else fades in.
    Create,
    FadeOut,
    /// Turns the arrow `from` into this one. `from` is hidden once the
    /// morph starts.
    Morph { from: ItemId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub item: ItemId,
    pub effect: Effect,
    pub start: f64,
    pub duration: f64,
}

impl Cue {
    fn progress(&self, t: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((t - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

/// An item as it appears in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawn {
    pub item: ItemId,
    pub shape: Shape,
    pub opacity: f64,
}

/// Every item appears at most once, through a `Create` or `Morph` cue, and
/// leaves at most once, through a `FadeOut` cue or by being morphed into
/// another item.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    items: Vec<Shape>,
    cues: Vec<Cue>,
    cursor: f64,
}

impl Timeline {
    pub fn new() -> Timeline {
        Timeline::default()
    }

    /// Registers a shape without showing it.
    pub fn add(&mut self, shape: Shape) -> ItemId {
        self.items.push(shape);
        self.items.len() - 1
    }

    pub fn shape(&self, id: ItemId) -> Option<&Shape> {
        self.items.get(id)
    }

    /// Makes the item visible at once, at the current time.
    pub fn show(&mut self, item: ItemId) {
        self.cues.push(Cue { item, effect: Effect::Create, start: self.cursor, duration: 0.0 });
    }

    /// Runs all `cues` together for `run_time` seconds.
    pub fn play(&mut self, run_time: f64, cues: &[(ItemId, Effect)]) {
        for &(item, effect) in cues {
            self.cues.push(Cue { item, effect, start: self.cursor, duration: run_time });
        }
        self.cursor += run_time;
    }

    pub fn wait(&mut self, secs: f64) {
        self.cursor += secs;
    }

    pub fn duration(&self) -> f64 {
        self.cursor
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    fn entrance(&self, item: ItemId) -> Option<&Cue> {
        self.cues
            .iter()
            .find(|c| c.item == item && matches!(c.effect, Effect::Create | Effect::Morph { .. }))
    }

    /// The visible items at time `t`, in the order they were added.
    pub fn frame(&self, t: f64) -> Vec<Drawn> {
        let mut drawn = Vec::new();
        for (item, shape) in self.items.iter().enumerate() {
            let Some(entrance) = self.entrance(item) else {
                continue;
            };
            if t < entrance.start {
                continue;
            }
            let replaced = self.cues.iter().any(|c| {
                matches!(c.effect, Effect::Morph { from } if from == item) && c.start <= t
            });
            if replaced {
                continue;
            }

            let p = entrance.progress(t);
            let mut opacity = 1.0;
            let shape = match entrance.effect {
                _ if p >= 1.0 => shape.clone(),
                Effect::Morph { from } => match (self.items.get(from), shape) {
                    (
                        Some(Shape::Arrow { tip: from_tip, color: from_color, .. }),
                        Shape::Arrow { tip, color, thick },
                    ) => Shape::Arrow {
                        tip: lerp(*from_tip, *tip, p),
                        color: if p < 0.5 { *from_color } else { *color },
                        thick: *thick,
                    },
                    _ => {
                        opacity *= p;
                        shape.clone()
                    }
                },
                _ => match shape {
                    Shape::Arrow { tip, color, thick } => Shape::Arrow {
                        tip: scale(*tip, p),
                        color: *color,
                        thick: *thick,
                    },
                    Shape::Line { start, end, color, dashed } => Shape::Line {
                        start: *start,
                        end: lerp(*start, *end, p),
                        color: *color,
                        dashed: *dashed,
                    },
                    _ => {
                        opacity *= p;
                        shape.clone()
                    }
                },
            };

            if let Some(fade) = self
                .cues
                .iter()
                .find(|c| c.item == item && c.effect == Effect::FadeOut && c.start <= t)
            {
                if t >= fade.start + fade.duration {
                    continue;
                }
                opacity *= 1.0 - fade.progress(t);
            }
            drawn.push(Drawn { item, shape, opacity });
        }
        drawn
    }
}
