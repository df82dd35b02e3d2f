//! Fixed-dimension vector arithmetic on plain `[f64; N]` arrays.

use crate::error::DomainError;

pub type Vector<const N: usize> = [f64; N];
pub type Point<const N: usize> = [f64; N];

/// Relative size of a cross product below which two vectors count as parallel.
pub const PARALLEL_TOLERANCE: f64 = 1e-12;

pub fn dot<const N: usize>(vec1: Vector<N>, vec2: Vector<N>) -> f64 {
    vec1.iter().zip(vec2.iter()).map(|(a, b)| a * b).sum()
}

/// Euclidean length, accumulated with `hypot` so huge or tiny components
/// neither overflow nor underflow.
pub fn get_magnitude<const N: usize>(vec: Vector<N>) -> f64 {
    vec.iter().fold(0.0, |acc: f64, &c| acc.hypot(c))
}

pub fn add<const N: usize>(a: Vector<N>, b: Vector<N>) -> Vector<N> {
    std::array::from_fn(|i| a[i] + b[i])
}

pub fn sub<const N: usize>(a: Vector<N>, b: Vector<N>) -> Vector<N> {
    std::array::from_fn(|i| a[i] - b[i])
}

pub fn scale<const N: usize>(vec: Vector<N>, factor: f64) -> Vector<N> {
    vec.map(|c| c * factor)
}

/// Vector pointing from `x` to `y`.
pub fn find_vector<const N: usize>(x: Point<N>, y: Point<N>) -> Vector<N> {
    sub(y, x)
}

pub fn lerp<const N: usize>(a: Vector<N>, b: Vector<N>, t: f64) -> Vector<N> {
    std::array::from_fn(|i| a[i] + (b[i] - a[i]) * t)
}

/// Returns the unit vector pointing the same way as `vec`.
///
/// # Errors
///
/// [`DomainError::ZeroVector`] when `vec` has no length (or a non-finite one).
pub fn normalize<const N: usize>(vec: Vector<N>) -> Result<Vector<N>, DomainError> {
    if vec.iter().any(|c| !c.is_finite()) {
        return Err(DomainError::ZeroVector);
    }
    let largest = vec.iter().fold(0.0, |acc: f64, c| acc.max(c.abs()));
    if largest == 0.0 {
        return Err(DomainError::ZeroVector);
    }
    // Bring the largest component to 1 first; the rescaled length is in [1, sqrt(N)].
    let rescaled = vec.map(|c| c / largest);
    let mag = get_magnitude(rescaled);
    Ok(rescaled.map(|c| c / mag))
}

/// Orthogonal projection of `subject` on the line spanned by `onto`.
///
/// `onto` is expected to be unit length; a longer `onto` scales the result
/// by the square of its length.
pub fn project<const N: usize>(onto: Vector<N>, subject: Vector<N>) -> Vector<N> {
    scale(onto, dot(subject, onto))
}

/// Projection of `subject` on the plane spanned by the orthonormal pair
/// `onto1`, `onto2`.
pub fn project2<const N: usize>(
    onto1: Vector<N>,
    onto2: Vector<N>,
    subject: Vector<N>,
) -> Vector<N> {
    add(project(onto1, subject), project(onto2, subject))
}

/// Projection of `subject` on the span of an orthonormal `basis`.
/// An empty basis spans only the origin.
pub fn project_onto_span<const N: usize>(
    basis: &[Vector<N>],
    subject: Vector<N>,
) -> Vector<N> {
    basis.iter().fold([0.0; N], |acc, &onto| add(acc, project(onto, subject)))
}

/// The part of `subject` left over once `projection` is taken away.
pub fn orthogonal_component<const N: usize>(
    subject: Vector<N>,
    projection: Vector<N>,
) -> Vector<N> {
    sub(subject, projection)
}

pub fn cross(a: Vector<3>, b: Vector<3>) -> Vector<3> {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Unit normal of the plane spanned by `v1` and `v2`.
///
/// # Errors
///
/// [`DomainError::ParallelVectors`] when the two vectors are parallel or
/// either is zero.
pub fn plane_normal(v1: Vector<3>, v2: Vector<3>) -> Result<Vector<3>, DomainError> {
    // The tolerance compares unit inputs, so it holds at any magnitude.
    let u1 = normalize(v1).map_err(|_| DomainError::ParallelVectors)?;
    let u2 = normalize(v2).map_err(|_| DomainError::ParallelVectors)?;
    let normal = cross(u1, u2);
    let mag = get_magnitude(normal);
    if mag <= PARALLEL_TOLERANCE {
        return Err(DomainError::ParallelVectors);
    }
    Ok(scale(normal, 1.0 / mag))
}

/// Two orthonormal vectors spanning the plane through the origin with the
/// given normal.
pub fn plane_basis(normal: Vector<3>) -> Result<(Vector<3>, Vector<3>), DomainError> {
    let n = normalize(normal)?;
    // Start from the axis least aligned with the normal.
    let mut axis = [0.0; 3];
    let least = (0..3)
        .min_by(|&i, &j| n[i].abs().total_cmp(&n[j].abs()))
        .unwrap_or(0);
    axis[least] = 1.0;
    let e1 = normalize(orthogonal_component(axis, project(n, axis)))?;
    let e2 = cross(n, e1);
    Ok((e1, e2))
}

/// Embeds a vector of up to three components in 3D, padding with zeros.
pub fn lift<const N: usize>(vec: Vector<N>) -> Vector<3> {
    let mut out = [0.0; 3];
    for (dst, src) in out.iter_mut().zip(vec.iter()) {
        *dst = *src;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use proptest::prelude::*;

    const TOL: f64 = 1e-9;

    fn assert_vec_eq<const N: usize>(actual: Vector<N>, expected: Vector<N>) {
        for i in 0..N {
            assert_abs_diff_eq!(actual[i], expected[i], epsilon = TOL);
        }
    }

    #[test]
    fn normalize_three_four() {
        assert_vec_eq(normalize([3.0, 4.0]).unwrap(), [0.6, 0.8]);
    }

    #[test]
    fn normalize_zero_vector_fails() {
        assert_eq!(normalize([0.0, 0.0, 0.0]), Err(DomainError::ZeroVector));
        assert_eq!(normalize([f64::NAN, 0.0]), Err(DomainError::ZeroVector));
    }

    #[test]
    fn normalize_extreme_magnitudes() {
        let diagonal = get_magnitude([1e200, 1e200]);
        assert_relative_eq!(diagonal, 2f64.sqrt() * 1e200, max_relative = TOL);
        let half = 0.5f64.sqrt();
        assert_vec_eq(normalize([1e200, 1e200]).unwrap(), [half, half]);
        assert_vec_eq(normalize([-1e200, 1e200, 0.0]).unwrap(), [-half, half, 0.0]);
        assert_vec_eq(normalize([1e-200, 0.0]).unwrap(), [1.0, 0.0]);
        assert_vec_eq(normalize([0.0, 3e-320]).unwrap(), [0.0, 1.0]);
        assert_vec_eq(normalize([f64::MAX, f64::MAX]).unwrap(), [half, half]);
        assert_eq!(normalize([f64::INFINITY, 0.0]), Err(DomainError::ZeroVector));
    }

    #[test]
    fn project_on_x_axis() {
        let proj = project([1.0, 0.0, 0.0], [2.0, 3.0, 0.0]);
        assert_vec_eq(proj, [2.0, 0.0, 0.0]);
        assert_vec_eq(orthogonal_component([2.0, 3.0, 0.0], proj), [0.0, 3.0, 0.0]);
    }

    #[test]
    fn project_with_long_onto_scales() {
        // |onto|^2 = 4
        let proj = project([2.0, 0.0], [1.0, 5.0]);
        assert_vec_eq(proj, [4.0, 0.0]);
    }

    #[test]
    fn project2_matches_span_projection() {
        let u1 = [1.0, 0.0, 0.0];
        let u2 = [0.0, 1.0, 0.0];
        let subject = [3.0, 0.5, 4.0];
        assert_vec_eq(project2(u1, u2, subject), [3.0, 0.5, 0.0]);
        assert_vec_eq(project_onto_span(&[u1, u2], subject), project2(u1, u2, subject));
        assert_vec_eq(project_onto_span::<3>(&[], subject), [0.0; 3]);
    }

    #[test]
    fn plane_normal_of_axes() {
        assert_vec_eq(plane_normal([2.0, 0.0, 0.0], [0.0, 5.0, 0.0]).unwrap(), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn plane_normal_of_extreme_axes() {
        let huge = plane_normal([1e200, 0.0, 0.0], [0.0, 1e200, 0.0]);
        assert_vec_eq(huge.unwrap(), [0.0, 0.0, 1.0]);
        let tiny = plane_normal([1e-200, 0.0, 0.0], [0.0, 1e-200, 0.0]);
        assert_vec_eq(tiny.unwrap(), [0.0, 0.0, 1.0]);
        let mixed = plane_normal([0.0, 0.0, 1e200], [1e-200, 0.0, 0.0]);
        assert_vec_eq(mixed.unwrap(), [0.0, 1.0, 0.0]);
        assert_eq!(
            plane_normal([1e200, 2e200, 0.0], [1e-200, 2e-200, 0.0]),
            Err(DomainError::ParallelVectors)
        );
    }

    #[test]
    fn plane_normal_parallel_fails() {
        let v = [1.0, 2.0, 3.0];
        assert_eq!(plane_normal(v, v), Err(DomainError::ParallelVectors));
        assert_eq!(plane_normal(v, scale(v, -2.5)), Err(DomainError::ParallelVectors));
        assert_eq!(plane_normal(v, [0.0; 3]), Err(DomainError::ParallelVectors));
    }

    #[test]
    fn plane_basis_is_orthonormal() {
        let n = [-2.0, 0.0, 1.0];
        let (e1, e2) = plane_basis(n).unwrap();
        assert_abs_diff_eq!(get_magnitude(e1), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(get_magnitude(e2), 1.0, epsilon = TOL);
        assert_abs_diff_eq!(dot(e1, e2), 0.0, epsilon = TOL);
        assert_abs_diff_eq!(dot(e1, n), 0.0, epsilon = TOL);
        assert_abs_diff_eq!(dot(e2, n), 0.0, epsilon = TOL);
        assert_eq!(plane_basis([0.0; 3]), Err(DomainError::ZeroVector));
    }

    #[test]
    fn lift_pads_with_zeros() {
        assert_eq!(lift([1.0, 2.0]), [1.0, 2.0, 0.0]);
        assert_eq!(lift([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    fn component() -> impl Strategy<Value = f64> {
        -100.0f64..100.0
    }

    proptest! {
        #[test]
        fn normalized_is_unit_and_parallel(v in prop::array::uniform3(component())) {
            prop_assume!(get_magnitude(v) > 1e-3);
            let u = normalize(v).unwrap();
            prop_assert!((get_magnitude(u) - 1.0).abs() < TOL);
            prop_assert!(get_magnitude(cross(u, v)) < 1e-9 * get_magnitude(v).max(1.0));
            prop_assert!(dot(u, v) > 0.0);
        }

        #[test]
        fn normalized_2d_keeps_orientation(v in prop::array::uniform2(component())) {
            prop_assume!(get_magnitude(v) > 1e-3);
            let u = normalize(v).unwrap();
            prop_assert!((get_magnitude(u) - 1.0).abs() < TOL);
            prop_assert!((u[0] * v[1] - u[1] * v[0]).abs() < 1e-9 * get_magnitude(v).max(1.0));
            prop_assert!(dot(u, v) > 0.0);
        }

        #[test]
        fn residual_is_orthogonal_to_line(
            onto in prop::array::uniform3(component()),
            subject in prop::array::uniform3(component()),
        ) {
            prop_assume!(get_magnitude(onto) > 1e-3);
            let u = normalize(onto).unwrap();
            let residual = orthogonal_component(subject, project(u, subject));
            prop_assert!(dot(residual, u).abs() < 1e-9 * get_magnitude(subject).max(1.0));
        }

        #[test]
        fn residual_is_orthogonal_to_plane(
            a in prop::array::uniform3(component()),
            b in prop::array::uniform3(component()),
            subject in prop::array::uniform3(component()),
        ) {
            prop_assume!(get_magnitude(cross(a, b)) > 1e-2 * get_magnitude(a) * get_magnitude(b));
            let u1 = normalize(a).unwrap();
            let u2 = normalize(orthogonal_component(b, project(u1, b))).unwrap();
            let residual = orthogonal_component(subject, project2(u1, u2, subject));
            let tol = 1e-9 * get_magnitude(subject).max(1.0);
            prop_assert!(dot(residual, u1).abs() < tol);
            prop_assert!(dot(residual, u2).abs() < tol);
        }

        #[test]
        fn plane_normal_is_unit_and_orthogonal(
            a in prop::array::uniform3(component()),
            b in prop::array::uniform3(component()),
        ) {
            prop_assume!(get_magnitude(cross(a, b)) > 1e-2 * get_magnitude(a) * get_magnitude(b));
            let n = plane_normal(a, b).unwrap();
            prop_assert!((get_magnitude(n) - 1.0).abs() < TOL);
            prop_assert!(dot(n, a).abs() < 1e-9 * get_magnitude(a).max(1.0));
            prop_assert!(dot(n, b).abs() < 1e-9 * get_magnitude(b).max(1.0));
        }
    }
}
