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

//! Canned animation selection and timing for rotation transitions.

use std::time::Duration;

use super::AnimationHint;
use crate::geometry::Rotation;

/// Ceiling applied to every rotation animation, however the duration scale
/// is configured.
pub const MAX_ANIMATION_DURATION: Duration = Duration::from_secs(10);

const ROTATE_DURATION: Duration = Duration::from_millis(500);
const ALPHA_DURATION: Duration = Duration::from_millis(250);

/// The canned animations a rotation transition is assembled from.
///
/// The content shift direction differs per quadrant, so each delta maps to
/// its own exit/enter pair rather than a parameterized formula.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    /// New content entering in its final orientation.
    Enter,
    /// Screenshot exiting with no orientation change (pure resize).
    Rotate0Exit,
    /// Screenshot exiting a 90-degree clockwise rotation.
    Plus90Exit,
    /// Content entering a 90-degree clockwise rotation.
    Plus90Enter,
    /// Screenshot exiting a half-turn rotation.
    Rotate180Exit,
    /// Content entering a half-turn rotation.
    Rotate180Enter,
    /// Screenshot exiting a 270-degree clockwise rotation.
    Minus90Exit,
    /// Content entering a 270-degree clockwise rotation.
    Minus90Enter,
    /// Screenshot cross-fading out (custom hint).
    CrossfadeExit,
    /// Screenshot cut without motion (custom hint).
    JumpcutExit,
    /// Alpha fade layered over a custom exit.
    AlphaFade,
}

/// One timed animation applied to a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Anim {
    /// Which canned animation runs.
    pub kind: AnimationKind,
    /// Scaled, clamped duration.
    pub duration: Duration,
}

impl Anim {
    fn new(kind: AnimationKind) -> Self {
        let duration = match kind {
            AnimationKind::AlphaFade => ALPHA_DURATION,
            _ => ROTATE_DURATION,
        };
        Self { kind, duration }
    }

    fn restrict_duration(&mut self, max: Duration) {
        if self.duration > max {
            self.duration = max;
        }
    }

    fn scale_duration(&mut self, scale: f32) {
        self.duration = self.duration.mul_f32(scale);
    }
}

/// Selects the exit/enter pair for a rotation delta.
///
/// Four disjoint pairs, one per quadrant; custom hints override the table.
pub fn animation_pair(delta: Rotation, hint: AnimationHint) -> (AnimationKind, AnimationKind) {
    match hint {
        AnimationHint::Crossfade => (AnimationKind::CrossfadeExit, AnimationKind::Enter),
        AnimationHint::Jumpcut => (AnimationKind::JumpcutExit, AnimationKind::Enter),
        AnimationHint::Rotate => match delta {
            Rotation::R0 => (AnimationKind::Rotate0Exit, AnimationKind::Enter),
            Rotation::R90 => (AnimationKind::Plus90Exit, AnimationKind::Plus90Enter),
            Rotation::R180 => (AnimationKind::Rotate180Exit, AnimationKind::Rotate180Enter),
            Rotation::R270 => (AnimationKind::Minus90Exit, AnimationKind::Minus90Enter),
        },
    }
}

/// The ordered set of timed animations driving one rotation transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotationAnimation {
    /// Animations in the order they are attached to the compositor.
    pub segments: Vec<Anim>,
}

impl RotationAnimation {
    /// Builds the animation set for a transition.
    ///
    /// The exiting-screenshot and entering-content animations are clamped
    /// to [`MAX_ANIMATION_DURATION`] and scaled by the same
    /// `duration_scale` so they stay synchronized.
    pub fn build(delta: Rotation, hint: AnimationHint, duration_scale: f32) -> Self {
        let (exit_kind, enter_kind) = animation_pair(delta, hint);

        let mut exit = Anim::new(exit_kind);
        let mut enter = Anim::new(enter_kind);
        exit.restrict_duration(MAX_ANIMATION_DURATION);
        exit.scale_duration(duration_scale);
        enter.restrict_duration(MAX_ANIMATION_DURATION);
        enter.scale_duration(duration_scale);

        let mut segments = Vec::new();
        if hint != AnimationHint::Rotate {
            let mut alpha = Anim::new(AnimationKind::AlphaFade);
            alpha.restrict_duration(MAX_ANIMATION_DURATION);
            alpha.scale_duration(duration_scale);
            segments.push(alpha);
        }
        segments.push(exit);
        segments.push(enter);
        Self { segments }
    }

    /// Returns the longest segment duration; the transition completes once
    /// this much time has elapsed.
    pub fn total_duration(&self) -> Duration {
        self.segments
            .iter()
            .map(|a| a.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}
