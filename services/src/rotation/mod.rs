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

//! Animated transitions between discrete display rotations.

pub(crate) mod animation;
pub(crate) mod transition;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use animation::{animation_pair, Anim, AnimationKind, RotationAnimation, MAX_ANIMATION_DURATION};
pub use transition::{Phase, RotationTransition, TransitionChange};

use crate::backend::GraphicsBackend;
use crate::utils::generator::HandleGenerator;

/// Which family of canned animations a transition uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationHint {
    /// Per-quadrant rotate pairs.
    #[default]
    Rotate,
    /// Cross-fade between old and new content.
    Crossfade,
    /// Hard cut, alpha only.
    Jumpcut,
}

/// Owns all in-flight rotation transitions.
///
/// The host scheduler drives progress via [`Self::on_frame`]; an explicit
/// [`Self::cancel`] may race with the animation-finished path, and the
/// transition's internal phase guard keeps the snapshot release single.
pub struct RotationTransitionAnimator {
    graphics: Arc<dyn GraphicsBackend>,
    transitions: Mutex<HashMap<u64, Arc<RotationTransition>>>,
}

impl RotationTransitionAnimator {
    /// Creates an animator bound to a graphics backend.
    pub fn new(graphics: Arc<dyn GraphicsBackend>) -> Self {
        Self {
            graphics,
            transitions: Mutex::new(HashMap::new()),
        }
    }

    /// Begins a transition and returns its handle.
    pub fn begin(&self, change: TransitionChange) -> u64 {
        let transition = Arc::new(RotationTransition::begin(self.graphics.clone(), change));
        let mut transitions = self.transitions.lock().unwrap();
        let handle = loop {
            let handle = HandleGenerator::generate();
            if !transitions.contains_key(&handle) {
                break handle;
            }
        };
        transitions.insert(handle, transition);
        handle
    }

    /// Looks up a live transition.
    pub fn get(&self, handle: u64) -> Option<Arc<RotationTransition>> {
        self.transitions.lock().unwrap().get(&handle).cloned()
    }

    /// Builds the timed animations for a transition.
    pub fn build_animation(&self, handle: u64, duration_scale: f32) -> Option<RotationAnimation> {
        self.get(handle)
            .and_then(|t| t.build_animation(duration_scale))
    }

    /// Advances a transition by the host frame clock, completing it when
    /// the animation has run its course. Returns the progress fraction
    /// while animating.
    pub fn on_frame(&self, handle: u64, elapsed: Duration) -> Option<f32> {
        let transition = self.get(handle)?;
        let progress = transition.on_frame(elapsed)?;
        if progress >= 1.0 {
            self.finish(handle, true);
        }
        Some(progress)
    }

    /// Cancels a transition, releasing its snapshot.
    pub fn cancel(&self, handle: u64) {
        self.finish(handle, false);
    }

    /// Completes a transition, releasing its snapshot.
    pub fn complete(&self, handle: u64) {
        self.finish(handle, true);
    }

    fn finish(&self, handle: u64, complete: bool) {
        let transition = match self.transitions.lock().unwrap().remove(&handle) {
            Some(transition) => transition,
            None => return,
        };
        if complete {
            transition.complete();
        } else {
            transition.cancel();
        }
    }
}
