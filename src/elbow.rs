//! The small bracket drawn where two perpendicular vectors meet.

use crate::error::DomainError;
use crate::library::*;

/// Arm length used by every scene unless told otherwise.
pub const DEFAULT_ARM_LENGTH: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment<const N: usize> {
    pub start: Point<N>,
    pub end: Point<N>,
}

impl<const N: usize> Segment<N> {
    pub fn length(&self) -> f64 {
        get_magnitude(find_vector(self.start, self.end))
    }
}

/// Two legs meeting at a corner plus a marker point inside the bracket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElbowGlyph<const N: usize> {
    pub segments: [Segment<N>; 2],
    pub marker: Point<N>,
}

impl<const N: usize> ElbowGlyph<N> {
    /// The shared endpoint of both legs.
    pub fn corner(&self) -> Point<N> {
        self.segments[0].end
    }

    /// Maps every point of the glyph, e.g. to embed a 2D glyph in 3D.
    pub fn map<const M: usize>(&self, f: impl Fn(Point<N>) -> Point<M>) -> ElbowGlyph<M> {
        let seg = |s: &Segment<N>| Segment { start: f(s.start), end: f(s.end) };
        ElbowGlyph {
            segments: [seg(&self.segments[0]), seg(&self.segments[1])],
            marker: f(self.marker),
        }
    }
}

/// Builds the right-angle bracket at `origin` with legs along `v1` and `v2`.
///
/// Only the directions of `v1` and `v2` matter. The glyph does not check
/// that they are perpendicular.
///
/// # Errors
///
/// [`DomainError::ZeroVector`] if either direction is the zero vector.
pub fn build_elbow<const N: usize>(
    v1: Vector<N>,
    v2: Vector<N>,
    origin: Point<N>,
    arm_length: f64,
) -> Result<ElbowGlyph<N>, DomainError> {
    let u1 = scale(normalize(v1)?, arm_length);
    let u2 = scale(normalize(v2)?, arm_length);
    let corner = add(origin, add(u1, u2));
    Ok(ElbowGlyph {
        segments: [
            Segment { start: add(origin, u1), end: corner },
            Segment { start: add(origin, u2), end: corner },
        ],
        marker: add(origin, scale(add(u1, u2), 0.5)),
    })
}

pub fn build_default_elbow<const N: usize>(
    v1: Vector<N>,
    v2: Vector<N>,
    origin: Point<N>,
) -> Result<ElbowGlyph<N>, DomainError> {
    build_elbow(v1, v2, origin, DEFAULT_ARM_LENGTH)
}
