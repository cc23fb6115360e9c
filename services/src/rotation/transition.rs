// Copyright (C) 2024 Huawei Device Co., Ltd.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! One in-flight rotation transition and its snapshot lifecycle.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::animation::RotationAnimation;
use super::AnimationHint;
use crate::backend::{GraphicsBackend, PixelBuffer};
use crate::geometry::{delta_rotation, Point, Rect, Rotation};
use crate::mirror::transform::{ScalingPolicy, Transform};

/// Phase of a rotation transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Phase {
    /// Created, snapshot not yet attempted.
    Idle = 0,
    /// Pre-rotation frame captured (or capture failed and the transition
    /// degrades to an instant cut).
    ScreenshotTaken = 1,
    /// Timed animations are running.
    Animating = 2,
    /// Terminal: animation finished.
    Complete = 3,
    /// Terminal, absorbing: transition was cancelled.
    Cancelled = 4,
}

impl Phase {
    fn from_repr(repr: u8) -> Self {
        match repr {
            0 => Phase::Idle,
            1 => Phase::ScreenshotTaken,
            2 => Phase::Animating,
            3 => Phase::Complete,
            _ => Phase::Cancelled,
        }
    }
}

/// Description of the rotation change handed in by the window manager.
#[derive(Debug)]
pub struct TransitionChange {
    /// Bounds before the rotation.
    pub start_bounds: Rect,
    /// Bounds after the rotation.
    pub end_bounds: Rect,
    /// Rotation before the change.
    pub start_rotation: Rotation,
    /// Rotation after the change.
    pub end_rotation: Rotation,
    /// Snapshot already captured by the caller, if any.
    pub snapshot: Option<PixelBuffer>,
    /// Border brightness of the provided snapshot.
    pub snapshot_luma: Option<f32>,
    /// Which animation family to use.
    pub anim_hint: AnimationHint,
}

/// One in-flight rotation animation.
///
/// The snapshot buffer is owned exclusively by the transition and released
/// exactly once, on whichever terminal transition fires first.
pub struct RotationTransition {
    graphics: Arc<dyn GraphicsBackend>,
    start_bounds: Rect,
    end_bounds: Rect,
    start_rotation: Rotation,
    end_rotation: Rotation,
    anim_hint: AnimationHint,
    phase: AtomicU8,
    snapshot: Mutex<Option<PixelBuffer>>,
    start_luma: f32,
    total_duration: Mutex<Option<Duration>>,
}

impl RotationTransition {
    /// Starts a transition: reuses the caller's snapshot when provided,
    /// otherwise captures the pre-rotation frame.
    ///
    /// A failed capture is non-fatal; the transition proceeds without the
    /// cross-fade and the rotation completes as an instant cut.
    pub fn begin(graphics: Arc<dyn GraphicsBackend>, change: TransitionChange) -> Self {
        let mut start_luma = change.snapshot_luma.unwrap_or(0.0);
        let snapshot = match change.snapshot {
            Some(buffer) => Some(buffer),
            None => match graphics.capture_region(Some(change.start_bounds)) {
                Ok(buffer) => {
                    start_luma = graphics.buffer_luma(&buffer);
                    Some(buffer)
                }
                Err(e) => {
                    info!("snapshot unavailable ({}), rotating with instant cut", e);
                    None
                }
            },
        };

        let transition = Self {
            graphics,
            start_bounds: change.start_bounds,
            end_bounds: change.end_bounds,
            start_rotation: change.start_rotation,
            end_rotation: change.end_rotation,
            anim_hint: change.anim_hint,
            phase: AtomicU8::new(Phase::ScreenshotTaken as u8),
            snapshot: Mutex::new(snapshot),
            start_luma,
            total_duration: Mutex::new(None),
        };
        debug!(
            "rotation transition {:?} -> {:?}, delta {:?}",
            transition.start_rotation,
            transition.end_rotation,
            transition.delta()
        );
        transition
    }

    /// The rotation applied to the snapshot: the inverse of the display's
    /// change, so the old frame appears to stay put while the display turns
    /// under it.
    pub fn delta(&self) -> Rotation {
        delta_rotation(self.end_rotation, self.start_rotation)
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        Phase::from_repr(self.phase.load(Ordering::Acquire))
    }

    /// Whether a snapshot is held for the cross-fade.
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.lock().unwrap().is_some()
    }

    /// Border brightness of the pre-rotation frame, for the backing color
    /// layer.
    pub fn start_luma(&self) -> f32 {
        self.start_luma
    }

    /// Computes the transform keeping the snapshot in its pre-rotation
    /// position under the new orientation.
    ///
    /// For a zero delta with a same-direction resize, the snapshot is
    /// uniformly scaled by the larger axis ratio instead.
    pub fn screenshot_transform(&self) -> Transform {
        let (sw, sh) = (self.start_bounds.width as i32, self.start_bounds.height as i32);
        let (ew, eh) = (self.end_bounds.width, self.end_bounds.height);
        match self.delta() {
            Rotation::R90 => Transform {
                rotation: Rotation::R90,
                offset: Point::new(sh, 0),
                ..Transform::identity()
            },
            Rotation::R180 => Transform {
                rotation: Rotation::R180,
                offset: Point::new(sw, sh),
                ..Transform::identity()
            },
            Rotation::R270 => Transform {
                rotation: Rotation::R270,
                offset: Point::new(0, sw),
                ..Transform::identity()
            },
            Rotation::R0 => {
                let grew = ew > self.start_bounds.width;
                let grew_h = eh > self.start_bounds.height;
                let resized = ew != self.start_bounds.width || eh != self.start_bounds.height;
                if resized && grew == grew_h {
                    Transform::fit(
                        self.start_bounds.size(),
                        self.end_bounds.size(),
                        ScalingPolicy::FillUniform,
                    )
                    .unwrap_or_else(Transform::identity)
                } else {
                    Transform::identity()
                }
            }
        }
    }

    /// Builds the timed animation set and moves the transition into
    /// `Animating`.
    ///
    /// Returns `None` when no snapshot is held (instant cut) or the
    /// transition already reached a terminal phase.
    pub fn build_animation(&self, duration_scale: f32) -> Option<RotationAnimation> {
        if !self.has_snapshot() {
            return None;
        }
        if self
            .phase
            .compare_exchange(
                Phase::ScreenshotTaken as u8,
                Phase::Animating as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_err()
        {
            return None;
        }
        let animation = RotationAnimation::build(self.delta(), self.anim_hint, duration_scale);
        *self.total_duration.lock().unwrap() = Some(animation.total_duration());
        Some(animation)
    }

    /// Reports elapsed animation time, returning the completion fraction.
    ///
    /// Returns `None` once the transition is terminal or no animation was
    /// built.
    pub fn on_frame(&self, elapsed: Duration) -> Option<f32> {
        if self.phase() != Phase::Animating {
            return None;
        }
        let total = (*self.total_duration.lock().unwrap())?;
        if total.is_zero() {
            return Some(1.0);
        }
        Some((elapsed.as_secs_f32() / total.as_secs_f32()).min(1.0))
    }

    /// Finishes the transition normally. Returns `true` for the call that
    /// performed the terminal transition.
    pub fn complete(&self) -> bool {
        self.finish(Phase::Complete)
    }

    /// Cancels the transition. Returns `true` for the call that performed
    /// the terminal transition.
    pub fn cancel(&self) -> bool {
        self.finish(Phase::Cancelled)
    }

    // The terminal CAS is the exactly-once guard for the snapshot release:
    // complete() and cancel() may race from different threads, and only the
    // winning transition takes the buffer out.
    fn finish(&self, terminal: Phase) -> bool {
        loop {
            let current = self.phase.load(Ordering::Acquire);
            if current == Phase::Complete as u8 || current == Phase::Cancelled as u8 {
                return false;
            }
            if self
                .phase
                .compare_exchange(current, terminal as u8, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                break;
            }
        }
        if let Some(buffer) = self.snapshot.lock().unwrap().take() {
            self.graphics.release_buffer(buffer);
        }
        debug!("rotation transition finished as {:?}", terminal);
        true
    }
}
