//! Column-major 4x4 homogeneous transform builders.
//!
//! Every function here is pure and total over finite floats, with the single
//! exception of [`perspective`], which rejects degenerate parameters. All
//! matrices are `glam::Mat4`, i.e. column-major, and compose right-to-left:
//! in `a * b`, `b` is applied to a vertex first.

use glam::{Mat4, Vec3, Vec4};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum XformError {
    /// The requested projection collapses the view volume.
    #[error("degenerate perspective projection: {0}")]
    DegenerateTransform(&'static str),
}

/// Identity with the translation column set from `position`.
pub fn translation(position: Vec3) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 1.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(position.x, position.y, position.z, 1.0),
    )
}

/// Uniform scale on x, y and z; the w row stays (0, 0, 0, 1).
pub fn scaling(scale: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(scale, 0.0, 0.0, 0.0),
        Vec4::new(0.0, scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, scale, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Scales the y axis only. Corrects a non-square aspect ratio for flat
/// geometry without going through a full perspective projection.
pub fn scaling_y(scale: f32) -> Mat4 {
    Mat4::from_cols(
        Vec4::new(1.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, scale, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new(0.0, 0.0, 0.0, 1.0),
    )
}

/// Axis-angle rotation.
///
/// `axis` must be pre-normalized by the caller; a non-unit axis silently
/// produces a non-orthonormal matrix. `angle == 0` yields the identity for
/// any axis, unit or not.
pub fn rotation(angle: f32, axis: Vec3) -> Mat4 {
    let (s, c) = angle.sin_cos();
    let x = Vec4::new(
        axis.x * axis.x + (1.0 - axis.x * axis.x) * c,
        axis.x * axis.y * (1.0 - c) - axis.z * s,
        axis.x * axis.z * (1.0 - c) + axis.y * s,
        0.0,
    );
    let y = Vec4::new(
        axis.x * axis.y * (1.0 - c) + axis.z * s,
        axis.y * axis.y + (1.0 - axis.y * axis.y) * c,
        axis.y * axis.z * (1.0 - c) - axis.x * s,
        0.0,
    );
    let z = Vec4::new(
        axis.x * axis.z * (1.0 - c) - axis.y * s,
        axis.y * axis.z * (1.0 - c) + axis.x * s,
        axis.z * axis.z + (1.0 - axis.z * axis.z) * c,
        0.0,
    );
    let w = Vec4::new(0.0, 0.0, 0.0, 1.0);
    Mat4::from_cols(x, y, z, w)
}

/// Right-handed perspective projection with OpenGL clip conventions
/// (depth mapped to [-1, 1]).
///
/// `fovy` is the vertical field of view in radians. Errors when
/// `far == near` or `aspect == 0`, which would divide the view volume away.
pub fn perspective(near: f32, far: f32, aspect: f32, fovy: f32) -> Result<Mat4, XformError> {
    if far == near {
        return Err(XformError::DegenerateTransform("far == near"));
    }
    if aspect == 0.0 {
        return Err(XformError::DegenerateTransform("aspect == 0"));
    }

    let scale_y = 1.0 / (fovy * 0.5).tan();
    let scale_x = scale_y / aspect;
    let scale_z = -(far + near) / (far - near);
    let scale_w = -2.0 * far * near / (far - near);

    Ok(Mat4::from_cols(
        Vec4::new(scale_x, 0.0, 0.0, 0.0),
        Vec4::new(0.0, scale_y, 0.0, 0.0),
        Vec4::new(0.0, 0.0, scale_z, -1.0),
        Vec4::new(0.0, 0.0, scale_w, 0.0),
    ))
}

/// Multiplies the given matrices right-to-left: the rightmost matrix is
/// applied to a vertex first. An empty slice composes to the identity.
pub fn compose(matrices: &[Mat4]) -> Mat4 {
    matrices
        .iter()
        .copied()
        .reduce(|acc, m| acc * m)
        .unwrap_or(Mat4::IDENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-5;

    fn assert_mat_approx(a: Mat4, b: Mat4) {
        let (a, b) = (a.to_cols_array(), b.to_cols_array());
        for i in 0..16 {
            assert!(
                (a[i] - b[i]).abs() < TOLERANCE,
                "matrices differ at element {}: {} vs {}",
                i,
                a[i],
                b[i]
            );
        }
    }

    #[test]
    fn zero_angle_rotation_is_identity() {
        let axes = [
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            Vec3::new(1.0, 1.0, 1.0).normalize(),
            // Edge case: even a non-unit axis degenerates to the identity.
            Vec3::new(3.0, -2.0, 0.5),
        ];
        for axis in axes {
            assert_mat_approx(rotation(0.0, axis), Mat4::IDENTITY);
        }
    }

    #[test]
    fn opposite_rotations_cancel() {
        let axis = Vec3::new(0.3, -0.5, 0.8).normalize();
        let angle = 0.7;
        let m = compose(&[rotation(angle, axis), rotation(-angle, axis)]);
        assert_mat_approx(m, Mat4::IDENTITY);
    }

    #[test]
    fn unit_axis_rotation_is_orthonormal() {
        let axis = Vec3::new(-0.2, 0.9, 0.4).normalize();
        let r = rotation(1.3, axis);
        assert_mat_approx(r * r.transpose(), Mat4::IDENTITY);
        // Affine invariant: the w row is untouched.
        assert_eq!(r.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn opposite_translations_cancel() {
        let v = Vec3::new(4.0, -2.5, 11.0);
        let m = compose(&[translation(v), translation(-v)]);
        assert_mat_approx(m, Mat4::IDENTITY);
    }

    #[test]
    fn perspective_rejects_degenerate_parameters() {
        assert_eq!(
            perspective(5.0, 5.0, 1.5, 1.0),
            Err(XformError::DegenerateTransform("far == near"))
        );
        assert_eq!(
            perspective(0.1, 100.0, 0.0, 1.0),
            Err(XformError::DegenerateTransform("aspect == 0"))
        );
    }

    #[test]
    fn perspective_is_projective_not_affine() {
        let p = perspective(0.1, 100.0, 16.0 / 9.0, 1.0).unwrap();
        assert_eq!(p.row(3), Vec4::new(0.0, 0.0, -1.0, 0.0));
        // A point on the far plane lands on the far clip face.
        let far = p.project_point3(Vec3::new(0.0, 0.0, -100.0));
        assert!((far.z - 1.0).abs() < TOLERANCE);
        // And one on the near plane lands on the near clip face.
        let near = p.project_point3(Vec3::new(0.0, 0.0, -0.1));
        assert!((near.z + 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn scaling_y_leaves_other_axes_alone() {
        let m = scaling_y(0.5);
        let p = m.transform_point3(Vec3::new(2.0, 2.0, 2.0));
        assert!((p.x - 2.0).abs() < TOLERANCE);
        assert!((p.y - 1.0).abs() < TOLERANCE);
        assert!((p.z - 2.0).abs() < TOLERANCE);
    }

    #[test]
    fn compose_applies_right_to_left() {
        // Scale first, then translate: (1,0,0) -> (2,0,0) -> (2,5,0).
        let m = compose(&[translation(Vec3::new(0.0, 5.0, 0.0)), scaling(2.0)]);
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(2.0, 5.0, 0.0)).length() < TOLERANCE);

        // The reverse order translates before scaling: (1,0,0) -> (1,5,0) -> (2,10,0).
        let m = compose(&[scaling(2.0), translation(Vec3::new(0.0, 5.0, 0.0))]);
        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(2.0, 10.0, 0.0)).length() < TOLERANCE);
    }

    #[test]
    fn compose_of_nothing_is_identity() {
        assert_mat_approx(compose(&[]), Mat4::IDENTITY);
    }
}
