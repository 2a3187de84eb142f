//! Shared per-frame input state.
//!
//! The render loop owns frame production; pointer moves and attitude samples
//! arrive from other callbacks at their own rates. Each update overwrites its
//! field entirely (last write wins, no queuing), and the orchestrator pulls a
//! consistent copy of everything exactly once per frame.

use std::f32::consts::PI;
use std::sync::{Mutex, PoisonError};

/// Initial model rotation in radians: a slight tilt on x and y so the mesh
/// does not face the camera dead-on at startup.
pub const INITIAL_TILT: [f32; 3] = [-PI / 16.0, PI / 16.0, 0.0];

/// Fixed per-frame decrement applied to the model's y rotation.
pub const ROTATION_STEP_Y: f32 = PI / 400.0;

/// Immutable copy of the frame state, taken once per frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSnapshot {
    /// Seconds elapsed since the first frame.
    pub timer: f32,
    /// Last known pointer position in surface pixels.
    pub pointer: [f32; 2],
    /// Last known device attitude: pitch, roll, yaw in radians.
    pub orientation: [f32; 3],
    /// Persistent model rotation accumulator.
    pub rotation: [f32; 3],
}

#[derive(Debug)]
pub struct FrameInputs {
    state: Mutex<FrameSnapshot>,
}

impl FrameInputs {
    /// Creates the aggregator with the timer at zero, the rotation at its
    /// initial tilt and the pointer at the given starting position.
    pub fn new(initial_pointer: [f32; 2]) -> Self {
        Self {
            state: Mutex::new(FrameSnapshot {
                timer: 0.0,
                pointer: initial_pointer,
                orientation: [0.0; 3],
                rotation: INITIAL_TILT,
            }),
        }
    }

    /// Overwrites the pointer position. Callable from any thread.
    pub fn update_pointer(&self, x: f32, y: f32) {
        self.lock().pointer = [x, y];
    }

    /// Overwrites the device attitude. Callable from any thread.
    pub fn update_orientation(&self, pitch: f32, roll: f32, yaw: f32) {
        self.lock().orientation = [pitch, roll, yaw];
    }

    /// Advances the timer and the model rotation, returning the frame's
    /// snapshot. Called exactly once per frame by the orchestrator.
    pub fn advance_frame(&self, delta_seconds: f32) -> FrameSnapshot {
        let mut state = self.lock();
        state.timer += delta_seconds;
        state.rotation[1] -= ROTATION_STEP_Y;
        *state
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FrameSnapshot> {
        // Every critical section is a plain field copy, so a poisoned lock
        // still holds consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn advance_frame_accumulates_time_and_spins() {
        let inputs = FrameInputs::new([0.0, 0.0]);

        let first = inputs.advance_frame(1.0 / 60.0);
        assert!((first.timer - 1.0 / 60.0).abs() < 1e-6);
        assert!((first.rotation[1] - (INITIAL_TILT[1] - ROTATION_STEP_Y)).abs() < 1e-6);
        // The x tilt never moves.
        assert_eq!(first.rotation[0], INITIAL_TILT[0]);

        let second = inputs.advance_frame(1.0 / 60.0);
        assert!((second.timer - 2.0 / 60.0).abs() < 1e-6);
        assert!((second.rotation[1] - (INITIAL_TILT[1] - 2.0 * ROTATION_STEP_Y)).abs() < 1e-6);
    }

    #[test]
    fn updates_are_last_write_wins() {
        let inputs = FrameInputs::new([10.0, 20.0]);

        inputs.update_pointer(1.0, 2.0);
        inputs.update_pointer(3.0, 4.0);
        inputs.update_orientation(0.1, 0.2, 0.3);
        inputs.update_orientation(0.4, 0.5, 0.6);

        let snap = inputs.advance_frame(0.0);
        assert_eq!(snap.pointer, [3.0, 4.0]);
        assert_eq!(snap.orientation, [0.4, 0.5, 0.6]);
    }

    #[test]
    fn updates_from_another_thread_are_visible() {
        let inputs = Arc::new(FrameInputs::new([0.0, 0.0]));

        let writer = {
            let inputs = Arc::clone(&inputs);
            std::thread::spawn(move || {
                inputs.update_orientation(0.7, -0.1, 0.2);
                inputs.update_pointer(640.0, 360.0);
            })
        };
        writer.join().expect("writer thread panicked");

        let snap = inputs.advance_frame(0.016);
        assert_eq!(snap.orientation, [0.7, -0.1, 0.2]);
        assert_eq!(snap.pointer, [640.0, 360.0]);
    }
}
