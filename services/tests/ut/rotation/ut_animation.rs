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

use super::*;

// @tc.name: ut_animation_pair_table
// @tc.desc: Test animation pair selection per rotation delta
// @tc.precon: NA
// @tc.step: 1. Query the exit/enter pair for every delta with the Rotate hint
// @tc.expect: Each quadrant maps to its own disjoint exit/enter pair
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_animation_pair_table() {
    assert_eq!(
        animation_pair(Rotation::R0, AnimationHint::Rotate),
        (AnimationKind::Rotate0Exit, AnimationKind::Enter)
    );
    assert_eq!(
        animation_pair(Rotation::R90, AnimationHint::Rotate),
        (AnimationKind::Plus90Exit, AnimationKind::Plus90Enter)
    );
    assert_eq!(
        animation_pair(Rotation::R180, AnimationHint::Rotate),
        (AnimationKind::Rotate180Exit, AnimationKind::Rotate180Enter)
    );
    assert_eq!(
        animation_pair(Rotation::R270, AnimationHint::Rotate),
        (AnimationKind::Minus90Exit, AnimationKind::Minus90Enter)
    );
}

// @tc.name: ut_animation_pair_custom_hints
// @tc.desc: Test that custom hints override the quadrant table
// @tc.precon: NA
// @tc.step: 1. Query pairs for Crossfade and Jumpcut hints across deltas
// @tc.expect: The hint decides the exit animation regardless of the delta
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_animation_pair_custom_hints() {
    for delta in [Rotation::R0, Rotation::R90, Rotation::R180, Rotation::R270] {
        assert_eq!(
            animation_pair(delta, AnimationHint::Crossfade),
            (AnimationKind::CrossfadeExit, AnimationKind::Enter)
        );
        assert_eq!(
            animation_pair(delta, AnimationHint::Jumpcut),
            (AnimationKind::JumpcutExit, AnimationKind::Enter)
        );
    }
}

// @tc.name: ut_animation_build_rotate
// @tc.desc: Test building a rotate animation set
// @tc.precon: NA
// @tc.step: 1. Build a 90-degree rotate animation with unit duration scale
// @tc.expect: Two segments with equal durations, no alpha segment
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_animation_build_rotate() {
    let animation = RotationAnimation::build(Rotation::R90, AnimationHint::Rotate, 1.0);
    assert_eq!(animation.segments.len(), 2);
    assert_eq!(animation.segments[0].kind, AnimationKind::Plus90Exit);
    assert_eq!(animation.segments[1].kind, AnimationKind::Plus90Enter);
    assert_eq!(
        animation.segments[0].duration,
        animation.segments[1].duration
    );
    assert_eq!(animation.total_duration(), Duration::from_millis(500));
}

// @tc.name: ut_animation_build_scaled
// @tc.desc: Test duration scaling keeps exit and enter synchronized
// @tc.precon: NA
// @tc.step: 1. Build a rotate animation with a duration scale of 2.0
// @tc.expect: Both segments stretch by the same factor
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_animation_build_scaled() {
    let animation = RotationAnimation::build(Rotation::R180, AnimationHint::Rotate, 2.0);
    for segment in &animation.segments {
        assert_eq!(segment.duration, Duration::from_millis(1000));
    }
    assert_eq!(animation.total_duration(), Duration::from_millis(1000));
}

// @tc.name: ut_animation_build_crossfade
// @tc.desc: Test building a crossfade animation set
// @tc.precon: NA
// @tc.step: 1. Build a crossfade animation with unit duration scale
// @tc.expect: A shorter alpha segment precedes the exit/enter pair
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_animation_build_crossfade() {
    let animation = RotationAnimation::build(Rotation::R90, AnimationHint::Crossfade, 1.0);
    assert_eq!(animation.segments.len(), 3);
    assert_eq!(animation.segments[0].kind, AnimationKind::AlphaFade);
    assert_eq!(animation.segments[0].duration, Duration::from_millis(250));
    assert_eq!(animation.segments[1].kind, AnimationKind::CrossfadeExit);
    assert_eq!(animation.segments[2].kind, AnimationKind::Enter);
    assert_eq!(animation.total_duration(), Duration::from_millis(500));
}

// @tc.name: ut_animation_max_duration
// @tc.desc: Test the animation duration ceiling
// @tc.precon: NA
// @tc.step: 1. Inspect the ceiling constant
//           2. Build an animation with a large duration scale
// @tc.expect: The ceiling binds the base duration before scaling is applied
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_animation_max_duration() {
    assert_eq!(MAX_ANIMATION_DURATION, Duration::from_secs(10));
    let animation = RotationAnimation::build(Rotation::R90, AnimationHint::Rotate, 4.0);
    assert_eq!(animation.total_duration(), Duration::from_millis(2000));
}
