//! Frame-constant scene parameters and the per-frame transform build.

use crate::input::FrameSnapshot;
use glam::{Mat4, Vec3};
use xform::{compose, perspective, rotation, scaling, translation, XformError};

/// This matrix converts clip-space coordinates from OpenGL conventions
/// (Z in [-1, 1]) to WebGPU conventions (Z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
]);

/// Uniform scale applied to the model before anything else.
pub const MODEL_SCALE: f32 = 0.2;

/// Drops the model below the view axis so it reads as sitting on a floor.
pub const MODEL_OFFSET: Vec3 = Vec3::new(0.0, -10.0, 0.0);

/// The camera backs away from the origin along -z.
pub const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 0.0, -50.0);

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;

/// Vertical field of view in radians.
pub const FOV_Y: f32 = 1.0;

/// Builds the frame's model-view-projection matrix in OpenGL clip
/// conventions (multiply by [`OPENGL_TO_WGPU_MATRIX`] before upload).
///
/// A vertex is scaled first, then tilted around x, spun around y, pushed to
/// the model offset, offset by the camera and finally projected:
/// `P * V * (T * Rx * Ry * S)`. The order is load-bearing; matrix
/// multiplication does not commute.
pub fn build_mvp(snapshot: &FrameSnapshot, aspect: f32) -> Result<Mat4, XformError> {
    let model = compose(&[
        translation(MODEL_OFFSET),
        rotation(snapshot.rotation[0], Vec3::X),
        rotation(snapshot.rotation[1], Vec3::Y),
        scaling(MODEL_SCALE),
    ]);
    let view = translation(CAMERA_OFFSET);
    let proj = perspective(NEAR_PLANE, FAR_PLANE, aspect, FOV_Y)?;
    Ok(compose(&[proj, view, model]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FrameInputs, INITIAL_TILT, ROTATION_STEP_Y};

    #[test]
    fn first_frame_places_the_demo_mesh_in_clip_space() {
        let inputs = FrameInputs::new([0.0, 0.0]);
        let snapshot = inputs.advance_frame(1.0 / 60.0);

        assert!((snapshot.timer - 0.0167).abs() < 1e-3);
        assert!((snapshot.rotation[1] - (INITIAL_TILT[1] - ROTATION_STEP_Y)).abs() < 1e-6);

        let mvp = build_mvp(&snapshot, 1024.0 / 768.0).expect("valid projection");

        // All eight bounding-box corners of the demo cube must land inside
        // the canonical clip cube after perspective division.
        for corner in [
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(-1.0, 1.0, -1.0),
            Vec3::new(1.0, 1.0, -1.0),
            Vec3::new(-1.0, -1.0, 1.0),
            Vec3::new(1.0, -1.0, 1.0),
            Vec3::new(-1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ] {
            let ndc = mvp.project_point3(corner);
            assert!(
                ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0 && ndc.z.abs() <= 1.0,
                "corner {corner} projected outside the clip cube: {ndc}"
            );
        }
    }

    #[test]
    fn degenerate_aspect_is_reported_not_panicked() {
        let inputs = FrameInputs::new([0.0, 0.0]);
        let snapshot = inputs.advance_frame(1.0 / 60.0);
        assert!(build_mvp(&snapshot, 0.0).is_err());
    }
}
