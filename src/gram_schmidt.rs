//! The Gram-Schmidt process, one visible step at a time.

use crate::elbow::{ElbowGlyph, build_elbow};
use crate::error::DomainError;
use crate::library::*;

/// Residuals shorter than this fraction of their base vector count as zero.
pub const DEPENDENCE_TOLERANCE: f64 = 1e-10;

/// One stage of the process for the base vector at `index` (0-based).
#[derive(Debug, Clone, PartialEq)]
pub enum Step<const N: usize> {
    /// `source` scaled to unit length gives the next orthonormal vector.
    Normalize {
        index: usize,
        source: Vector<N>,
        unit: Vector<N>,
    },
    /// `subject` projected on the span of the units found so far.
    Project {
        index: usize,
        subject: Vector<N>,
        projection: Vector<N>,
        /// Right angle between the projection and the residual. `None` when
        /// the subject was already orthogonal to the span.
        elbow: Option<ElbowGlyph<N>>,
    },
    /// What is left of the subject once the projection is removed.
    Subtract { index: usize, residual: Vector<N> },
}

impl<const N: usize> Step<N> {
    pub fn index(&self) -> usize {
        match self {
            Step::Normalize { index, .. }
            | Step::Project { index, .. }
            | Step::Subtract { index, .. } => *index,
        }
    }

    pub fn caption(&self) -> String {
        match *self {
            Step::Normalize { index: 0, .. } => "Normalize v1 to get w1".to_string(),
            Step::Normalize { index, .. } => format!("Normalize to get w{}", index + 1),
            Step::Project { index: 1, .. } => "Project v2 onto w1 to get p".to_string(),
            Step::Project { index, .. } => {
                let span = (1..=index).map(|i| format!("w{i}")).collect::<Vec<_>>().join(", ");
                format!("Project v{} onto span({span})", index + 1)
            }
            Step::Subtract { index, .. } => {
                format!("Subtract the projection from v{}", index + 1)
            }
        }
    }
}

fn check_count<const N: usize>(basis: &[Vector<N>]) -> Result<(), DomainError> {
    if basis.len() > N {
        return Err(DomainError::TooManyVectors { count: basis.len(), dim: N });
    }
    Ok(())
}

/// Projection of the base vector at `index` and its residual, failing when
/// the residual vanishes.
fn split<const N: usize>(
    units: &[Vector<N>],
    subject: Vector<N>,
    index: usize,
) -> Result<(Vector<N>, Vector<N>), DomainError> {
    let projection = project_onto_span(units, subject);
    let residual = orthogonal_component(subject, projection);
    if get_magnitude(residual) <= DEPENDENCE_TOLERANCE * get_magnitude(subject) {
        return Err(DomainError::LinearlyDependent { index });
    }
    Ok((projection, residual))
}

/// Orthonormal vectors `w1..wk` with `span(w1..wi) == span(v1..vi)` for
/// every `i`.
pub fn orthonormalize<const N: usize>(basis: &[Vector<N>]) -> Result<Vec<Vector<N>>, DomainError> {
    check_count(basis)?;
    let mut units: Vec<Vector<N>> = Vec::with_capacity(basis.len());
    for (index, &subject) in basis.iter().enumerate() {
        let (_, residual) = split(&units, subject, index)?;
        let unit = normalize(residual).map_err(|_| DomainError::LinearlyDependent { index })?;
        units.push(unit);
    }
    Ok(units)
}

/// Records every step of the process over `basis`, with the right-angle
/// glyphs of size `arm_length` that illustrate each projection.
pub fn walk<const N: usize>(
    basis: &[Vector<N>],
    arm_length: f64,
) -> Result<Vec<Step<N>>, DomainError> {
    check_count(basis)?;
    let mut units: Vec<Vector<N>> = Vec::with_capacity(basis.len());
    let mut steps = Vec::with_capacity(basis.len() * 3);
    for (index, &subject) in basis.iter().enumerate() {
        let (projection, residual) = split(&units, subject, index)?;
        if index > 0 {
            let tolerance = DEPENDENCE_TOLERANCE * get_magnitude(subject);
            let elbow = if get_magnitude(projection) > tolerance {
                Some(build_elbow(scale(projection, -1.0), residual, projection, arm_length)?)
            } else {
                log::debug!("v{} is already orthogonal to the span", index + 1);
                None
            };
            steps.push(Step::Project { index, subject, projection, elbow });
            steps.push(Step::Subtract { index, residual });
        }
        let unit = normalize(residual).map_err(|_| DomainError::LinearlyDependent { index })?;
        log::debug!("w{} = {:?}", index + 1, unit);
        steps.push(Step::Normalize { index, source: residual, unit });
        units.push(unit);
    }
    Ok(steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elbow::DEFAULT_ARM_LENGTH;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn assert_orthonormal<const N: usize>(units: &[Vector<N>]) {
        for (i, a) in units.iter().enumerate() {
            assert_abs_diff_eq!(get_magnitude(*a), 1.0, epsilon = 1e-9);
            for b in &units[i + 1..] {
                assert_abs_diff_eq!(dot(*a, *b), 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn orthonormalize_plane_scene() {
        let units = orthonormalize(&[[-1.5, 2.0], [0.5, 3.0]]).unwrap();
        assert_orthonormal(&units);
        assert_abs_diff_eq!(units[0][0], -0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(units[0][1], 0.8, epsilon = 1e-12);
        // w2 keeps the side of v2
        assert!(dot(units[1], [0.5, 3.0]) > 0.0);
    }

    #[test]
    fn orthonormalize_space_scene() {
        let basis = [[-3.0, 0.0, 1.0], [-2.0, -3.0, 0.5], [3.0, 0.5, 4.0]];
        let units = orthonormalize(&basis).unwrap();
        assert_eq!(units.len(), 3);
        assert_orthonormal(&units);
        // w3 is orthogonal to v1 and v2
        assert_abs_diff_eq!(dot(units[2], basis[0]), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(dot(units[2], basis[1]), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn dependent_basis_fails() {
        assert_eq!(
            orthonormalize(&[[1.0, 2.0, 3.0], [2.0, 4.0, 6.0]]),
            Err(DomainError::LinearlyDependent { index: 1 })
        );
        assert_eq!(
            orthonormalize(&[[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [3.0, -2.0, 0.0]]),
            Err(DomainError::LinearlyDependent { index: 2 })
        );
        assert_eq!(
            walk(&[[0.0, 0.0], [1.0, 0.0]], DEFAULT_ARM_LENGTH),
            Err(DomainError::LinearlyDependent { index: 0 })
        );
    }

    #[test]
    fn too_many_vectors_fails() {
        assert_eq!(
            orthonormalize(&[[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]]),
            Err(DomainError::TooManyVectors { count: 3, dim: 2 })
        );
    }

    #[test]
    fn walk_records_steps_in_order() {
        let basis = [[-3.0, 0.0, 1.0], [-2.0, -3.0, 0.5], [3.0, 0.5, 4.0]];
        let steps = walk(&basis, DEFAULT_ARM_LENGTH).unwrap();
        let captions: Vec<String> = steps.iter().map(Step::caption).collect();
        assert_eq!(
            captions,
            [
                "Normalize v1 to get w1",
                "Project v2 onto w1 to get p",
                "Subtract the projection from v2",
                "Normalize to get w2",
                "Project v3 onto span(w1, w2)",
                "Subtract the projection from v3",
                "Normalize to get w3",
            ]
        );
        let indices: Vec<usize> = steps.iter().map(Step::index).collect();
        assert_eq!(indices, [0, 1, 1, 1, 2, 2, 2]);

        let units = orthonormalize(&basis).unwrap();
        for step in &steps {
            if let Step::Normalize { index, unit, .. } = step {
                assert_eq!(*unit, units[*index]);
            }
        }
    }

    #[test]
    fn walk_elbow_sits_on_projection() {
        let steps = walk(&[[1.0, 0.0], [2.0, 3.0]], 0.4).unwrap();
        let Step::Project { projection, elbow: Some(elbow), .. } = &steps[1] else {
            panic!("expected a projection with an elbow, got {:?}", steps[1]);
        };
        assert_eq!(*projection, [2.0, 0.0]);
        // legs run back towards the origin and up to v2
        assert_abs_diff_eq!(elbow.segments[0].start[0], 1.6, epsilon = 1e-12);
        assert_abs_diff_eq!(elbow.segments[1].start[1], 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(elbow.corner()[0], 1.6, epsilon = 1e-12);
        assert_abs_diff_eq!(elbow.corner()[1], 0.4, epsilon = 1e-12);
    }

    #[test]
    fn walk_skips_elbow_for_orthogonal_input() {
        let steps = walk(&[[1.0, 0.0], [0.0, 2.0]], 0.4).unwrap();
        assert!(matches!(steps[1], Step::Project { elbow: None, .. }));
        assert_eq!(steps[2], Step::Subtract { index: 1, residual: [0.0, 2.0] });
    }

    proptest! {
        #[test]
        fn random_bases_become_orthonormal(
            a in prop::array::uniform3(-10.0f64..10.0),
            b in prop::array::uniform3(-10.0f64..10.0),
            c in prop::array::uniform3(-10.0f64..10.0),
        ) {
            // keep well-conditioned bases only
            let det = dot(a, cross(b, c));
            prop_assume!(det.abs() > 1e-1 * get_magnitude(a) * get_magnitude(b) * get_magnitude(c));
            let units = orthonormalize(&[a, b, c]).unwrap();
            for (i, u) in units.iter().enumerate() {
                prop_assert!((get_magnitude(*u) - 1.0).abs() < 1e-9);
                for w in &units[i + 1..] {
                    prop_assert!(dot(*u, *w).abs() < 1e-9);
                }
            }
        }
    }
}
