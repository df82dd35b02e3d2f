//! Scripted Gram-Schmidt scenes: coordinates, axes, camera and timeline.

use std::f64::consts::FRAC_PI_2;
use std::str::FromStr;

use rand::Rng;

use crate::error::DomainError;
use crate::gram_schmidt::{Step, walk};
use crate::library::*;
use crate::timeline::{Effect, ItemId, Palette, Shape, Timeline};

pub const PLANE_2D_BASIS: [Vector<2>; 2] = [[-1.5, 2.0], [0.5, 3.0]];
pub const SPAN_2D_IN_3D_BASIS: [Vector<3>; 2] = [[-2.0, 0.0, 1.0], [0.0, 0.5, 3.0]];
pub const SPAN_3D_BASIS: [Vector<3>; 3] = [[-3.0, 0.0, 1.0], [-2.0, -3.0, 0.5], [3.0, 0.5, 4.0]];

/// Half side of the quads drawn for spans.
const PLANE_EXTENT: f64 = 4.0;
const BASE_COLORS: [Palette; 3] = [Palette::Red, Palette::Blue, Palette::Green];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneKind {
    /// Two vectors in the plane.
    Plane2d,
    /// Two vectors in space and the plane they span.
    Span2dIn3d,
    /// Three vectors in space.
    Span3dIn3d,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scene '{0}', expected one of plane2d, span2d-in3d, span3d")]
pub struct UnknownScene(pub String);

impl FromStr for SceneKind {
    type Err = UnknownScene;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "plane2d" => Ok(SceneKind::Plane2d),
            "span2d-in3d" => Ok(SceneKind::Span2dIn3d),
            "span3d" => Ok(SceneKind::Span3dIn3d),
            _ => Err(UnknownScene(s.to_string())),
        }
    }
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] =
        [SceneKind::Plane2d, SceneKind::Span2dIn3d, SceneKind::Span3dIn3d];

    pub fn title(&self) -> &'static str {
        match self {
            SceneKind::Plane2d => "Gram-Schmidt in 2D",
            SceneKind::Span2dIn3d => "Gram-Schmidt: a 2D span in 3D",
            SceneKind::Span3dIn3d => "Gram-Schmidt in 3D",
        }
    }

    pub fn dimension(&self) -> usize {
        match self {
            SceneKind::Plane2d => 2,
            _ => 3,
        }
    }

    pub fn vector_count(&self) -> usize {
        match self {
            SceneKind::Span3dIn3d => 3,
            _ => 2,
        }
    }

    pub fn axes(&self) -> AxesSpec {
        match self {
            SceneKind::Plane2d => AxesSpec {
                x_range: [-6.0, 6.0],
                y_range: [-4.0, 4.0],
                z_range: None,
            },
            _ => AxesSpec {
                x_range: [-6.0, 6.0],
                y_range: [-6.0, 6.0],
                z_range: Some([-6.0, 6.0]),
            },
        }
    }

    pub fn camera(&self) -> Camera {
        match self {
            SceneKind::Plane2d => Camera::FLAT,
            _ => Camera::from_degrees(70.0, -40.0, 1.3),
        }
    }

    /// Seconds spent on each animated step.
    fn step_time(&self) -> f64 {
        match self {
            SceneKind::Plane2d => 3.0,
            _ => 2.0,
        }
    }
}

/// Axis ranges in scene units, one tick per unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxesSpec {
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub z_range: Option<[f64; 2]>,
}

/// Orthographic camera placed by spherical angles, in radians: `phi` from
/// the `+z` axis and `theta` around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub phi: f64,
    pub theta: f64,
    pub zoom: f64,
}

impl Camera {
    /// Looking straight down at the xy plane.
    pub const FLAT: Camera = Camera { phi: 0.0, theta: -FRAC_PI_2, zoom: 1.0 };

    pub fn from_degrees(phi: f64, theta: f64, zoom: f64) -> Camera {
        Camera { phi: phi.to_radians(), theta: theta.to_radians(), zoom }
    }

    /// Screen position of `p`, x to the right and y up, in scene units.
    pub fn project(&self, p: Point<3>) -> [f64; 2] {
        let alpha = -(self.theta + FRAC_PI_2);
        let (sin_a, cos_a) = alpha.sin_cos();
        let x = p[0] * cos_a - p[1] * sin_a;
        let y = p[0] * sin_a + p[1] * cos_a;
        let (sin_p, cos_p) = self.phi.sin_cos();
        [x * self.zoom, (y * cos_p + p[2] * sin_p) * self.zoom]
    }
}

/// Draws `count` vectors on the half-unit grid in `[-4, 4]^N` until they are
/// comfortably independent: each keeps at least one unit of length once the
/// previous ones are projected out.
pub fn random_basis<const N: usize>(
    count: usize,
    rng: &mut impl Rng,
) -> Result<Vec<Vector<N>>, DomainError> {
    if count > N {
        return Err(DomainError::TooManyVectors { count, dim: N });
    }
    loop {
        let basis: Vec<Vector<N>> = (0..count)
            .map(|_| std::array::from_fn(|_| rng.random_range(-8..=8) as f64 * 0.5))
            .collect();
        let Ok(steps) = walk(&basis, crate::elbow::DEFAULT_ARM_LENGTH) else {
            continue;
        };
        let comfortable = steps.iter().all(|step| match step {
            Step::Normalize { source, .. } => get_magnitude(*source) >= 1.0,
            _ => true,
        });
        if comfortable {
            log::debug!("random basis {:?}", basis);
            return Ok(basis);
        }
    }
}

/// Corners of the square patch of the plane through the origin with the
/// given normal.
fn plane_patch(normal: Vector<3>, extent: f64) -> Result<[Point<3>; 4], DomainError> {
    let (e1, e2) = plane_basis(normal)?;
    let (a, b) = (scale(e1, extent), scale(e2, extent));
    Ok([add(a, b), sub(b, a), scale(add(a, b), -1.0), sub(a, b)])
}

fn label_anchor(tip: Point<3>) -> Point<3> {
    scale(tip, 1.12)
}

/// A scene ready to play.
#[derive(Debug, Clone)]
pub struct Scene {
    pub kind: SceneKind,
    pub axes: AxesSpec,
    pub camera: Camera,
    pub basis: Vec<Point<3>>,
    /// Every caption in order of appearance.
    pub captions: Vec<String>,
    pub timeline: Timeline,
}

impl Scene {
    /// The scene with the coordinates it was designed around.
    pub fn preset(kind: SceneKind, arm_length: f64) -> Result<Scene, DomainError> {
        match kind {
            SceneKind::Plane2d => Scene::build(kind, &PLANE_2D_BASIS, arm_length),
            SceneKind::Span2dIn3d => Scene::build(kind, &SPAN_2D_IN_3D_BASIS, arm_length),
            SceneKind::Span3dIn3d => Scene::build(kind, &SPAN_3D_BASIS, arm_length),
        }
    }

    /// The same script over a random basis of the right size.
    pub fn random(
        kind: SceneKind,
        arm_length: f64,
        rng: &mut impl Rng,
    ) -> Result<Scene, DomainError> {
        let count = kind.vector_count();
        match kind.dimension() {
            2 => Scene::build(kind, &random_basis::<2>(count, rng)?, arm_length),
            _ => Scene::build(kind, &random_basis::<3>(count, rng)?, arm_length),
        }
    }

    pub fn build<const N: usize>(
        kind: SceneKind,
        basis: &[Vector<N>],
        arm_length: f64,
    ) -> Result<Scene, DomainError> {
        let steps = walk(basis, arm_length)?;
        let lifted: Vec<Point<3>> = basis.iter().map(|v| lift(*v)).collect();
        log::debug!("building {:?} over {:?}", kind, lifted);

        let mut script = Script::new(kind.step_time());
        script.intro(&lifted);
        if kind == SceneKind::Span2dIn3d && lifted.len() >= 2 {
            script.span(lifted[0], lifted[1], "v", Palette::Green, "They span a 2D plane")?;
        }
        for step in &steps {
            script.step(step, &lifted)?;
        }

        let Script { timeline, captions, .. } = script;
        log::info!(
            "{} ready: {} captions, {:.1}s",
            kind.title(),
            captions.len(),
            timeline.duration()
        );
        Ok(Scene {
            kind,
            axes: kind.axes(),
            camera: kind.camera(),
            basis: lifted,
            captions,
            timeline,
        })
    }

    pub fn duration(&self) -> f64 {
        self.timeline.duration()
    }
}

/// Builder state while turning steps into cues.
struct Script {
    timeline: Timeline,
    captions: Vec<String>,
    caption: Option<ItemId>,
    step_time: f64,
    units: Vec<Point<3>>,
    /// Arrow carried from `v_k` to its residual and then to `w_k`.
    working: Option<ItemId>,
    /// Dashed line, elbow and projection of the current step.
    projection: Vec<ItemId>,
}

impl Script {
    fn new(step_time: f64) -> Script {
        Script {
            timeline: Timeline::new(),
            captions: Vec::new(),
            caption: None,
            step_time,
            units: Vec::new(),
            working: None,
            projection: Vec::new(),
        }
    }

    /// Fades out the current caption along with `extra`, and registers the
    /// next one without showing it.
    fn next_caption(&mut self, text: String, extra: &[ItemId]) -> ItemId {
        let outgoing: Vec<(ItemId, Effect)> = self
            .caption
            .iter()
            .chain(extra.iter())
            .map(|&id| (id, Effect::FadeOut))
            .collect();
        if !outgoing.is_empty() {
            self.timeline.play(1.0, &outgoing);
        }
        let id = self.timeline.add(Shape::Caption { text: text.clone() });
        self.captions.push(text);
        self.caption = Some(id);
        id
    }

    fn intro(&mut self, basis: &[Point<3>]) {
        let names: Vec<String> = (1..=basis.len()).map(|i| format!("v{i}")).collect();
        let caption = self.next_caption(format!("Base vectors: {}", names.join(", ")), &[]);
        let mut cues = vec![(caption, Effect::Create)];
        for (i, (&tip, name)) in basis.iter().zip(names).enumerate() {
            let color = BASE_COLORS[i % BASE_COLORS.len()];
            let arrow = self.timeline.add(Shape::Arrow { tip, color, thick: false });
            let anchor = label_anchor(tip);
            let label = self.timeline.add(Shape::Label { text: name, anchor, color });
            cues.push((arrow, Effect::Create));
            cues.push((label, Effect::Create));
        }
        self.timeline.play(2.0, &cues);
        self.timeline.wait(1.0);
    }

    /// Shows the plane spanned by `a` and `b`, naming the vectors `{prefix}1`
    /// and `{prefix}2`.
    fn span(
        &mut self,
        a: Point<3>,
        b: Point<3>,
        prefix: &str,
        color: Palette,
        text: &str,
    ) -> Result<(), DomainError> {
        let normal = plane_normal(a, b)?;
        let corners = plane_patch(normal, PLANE_EXTENT)?;
        let extra = std::mem::take(&mut self.projection);
        let caption = self.next_caption(text.to_string(), &extra);
        let plane = self.timeline.add(Shape::Plane { corners, color });
        let label = self.timeline.add(Shape::Label {
            text: format!("span({prefix}1, {prefix}2)"),
            anchor: corners[3],
            color,
        });
        self.timeline.play(
            2.0,
            &[(plane, Effect::Create), (label, Effect::Create), (caption, Effect::Create)],
        );
        self.timeline.wait(1.0);
        Ok(())
    }

    /// A yellow copy of `from` that turns into `tip`.
    fn morph(
        &mut self,
        from: Point<3>,
        from_color: Palette,
        tip: Point<3>,
        caption: ItemId,
    ) -> ItemId {
        let source = match self.working.take() {
            Some(id) => id,
            None => {
                let copy =
                    self.timeline.add(Shape::Arrow { tip: from, color: from_color, thick: false });
                self.timeline.show(copy);
                copy
            }
        };
        let target = self.timeline.add(Shape::Arrow { tip, color: Palette::Yellow, thick: true });
        self.timeline.play(
            self.step_time,
            &[(target, Effect::Morph { from: source }), (caption, Effect::Create)],
        );
        target
    }

    fn step<const N: usize>(
        &mut self,
        step: &Step<N>,
        basis: &[Point<3>],
    ) -> Result<(), DomainError> {
        let text = step.caption();
        match *step {
            Step::Normalize { index, source, unit } => {
                let unit = lift(unit);
                let caption = self.next_caption(text, &[]);
                self.morph(lift(source), BASE_COLORS[index % BASE_COLORS.len()], unit, caption);
                let label = self.timeline.add(Shape::Label {
                    text: format!("w{}", index + 1),
                    anchor: label_anchor(unit),
                    color: Palette::Yellow,
                });
                self.timeline.play(1.0, &[(label, Effect::Create)]);
                self.timeline.wait(if index == 0 { 1.0 } else { 2.0 });
                self.units.push(unit);
            }
            Step::Project { index, subject, projection, elbow } => {
                let (subject, projection) = (lift(subject), lift(projection));
                let line = self.timeline.add(Shape::Line {
                    start: projection,
                    end: subject,
                    color: Palette::White,
                    dashed: true,
                });
                let mut group = vec![(line, Effect::Create)];
                if let Some(glyph) = elbow {
                    let glyph = glyph.map(lift);
                    let elbow = self.timeline.add(Shape::Elbow { glyph, color: Palette::White });
                    group.push((elbow, Effect::Create));
                }

                if index >= 2 && self.units.len() >= 2 {
                    // the span of the previous units gets drawn first
                    let (w1, w2) = (self.units[0], self.units[1]);
                    self.span(w1, w2, "w", Palette::Orange, &text)?;
                } else {
                    let extra = std::mem::take(&mut self.projection);
                    let caption = self.next_caption(text, &extra);
                    group.push((caption, Effect::Create));
                }
                self.timeline.play(self.step_time, &group);

                let arrow = self.timeline.add(Shape::Arrow {
                    tip: projection,
                    color: Palette::Purple,
                    thick: false,
                });
                let label = self.timeline.add(Shape::Label {
                    text: "p".to_string(),
                    anchor: label_anchor(projection),
                    color: Palette::Purple,
                });
                self.timeline
                    .play(self.step_time, &[(arrow, Effect::Create), (label, Effect::Create)]);
                self.timeline.wait(1.0);
                self.projection = group
                    .iter()
                    .map(|&(id, _)| id)
                    .filter(|id| Some(*id) != self.caption)
                    .chain([arrow, label])
                    .collect();
            }
            Step::Subtract { index, residual } => {
                let caption = self.next_caption(text, &[]);
                let color = BASE_COLORS[index % BASE_COLORS.len()];
                let target = self.morph(basis[index], color, lift(residual), caption);
                self.timeline.wait(1.0);
                self.working = Some(target);
            }
        }
        Ok(())
    }
}
