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

use mockall::mock;
use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

use super::*;
use crate::backend::{PixelBuffer, SurfaceHandle};
use crate::error::CaptureError;
use crate::geometry::Rotation;
use crate::mirror::{event_channel, MirrorEvent, Transform};
use crate::rotation::AnimationHint;

mock! {
    pub(crate) Graphics {}

    impl GraphicsBackend for Graphics {
        fn resolve_target(&self, target: &CaptureTarget) -> Option<Rect>;
        fn capture_region(&self, bounds: Option<Rect>) -> Result<PixelBuffer, CaptureError>;
        fn create_mirror_surface(&self, size: Size) -> Result<SurfaceHandle, CaptureError>;
        fn set_transform(&self, handle: SurfaceHandle, transform: &Transform);
        fn set_crop(&self, handle: SurfaceHandle, size: Size);
        fn show(&self, handle: SurfaceHandle);
        fn hide(&self, handle: SurfaceHandle);
        fn release_surface(&self, handle: SurfaceHandle);
        fn release_buffer(&self, buffer: PixelBuffer);
        fn buffer_luma(&self, buffer: &PixelBuffer) -> f32;
    }
}

static RUNTIME: Lazy<Runtime> = Lazy::new(|| Runtime::new().unwrap());

const CONTENT: Rect = Rect {
    x: 0,
    y: 0,
    width: 100,
    height: 200,
};

fn permissive_graphics() -> MockGraphics {
    let mut graphics = MockGraphics::new();
    graphics
        .expect_resolve_target()
        .returning(|_| Some(CONTENT));
    graphics
        .expect_create_mirror_surface()
        .returning(|_| Ok(SurfaceHandle(7)));
    graphics.expect_set_crop().returning(|_, _| ());
    graphics.expect_set_transform().returning(|_, _| ());
    graphics.expect_show().returning(|_| ());
    graphics.expect_hide().returning(|_| ());
    graphics.expect_release_surface().returning(|_| ());
    graphics.expect_capture_region().returning(|_| {
        Ok(PixelBuffer {
            id: 1,
            size: CONTENT.size(),
        })
    });
    graphics.expect_buffer_luma().returning(|_| 0.5);
    graphics.expect_release_buffer().returning(|_| ());
    graphics
}

// @tc.name: ut_manage_session_lifecycle
// @tc.desc: Test driving a capture session through the manager loop
// @tc.precon: NA
// @tc.step: 1. Start a session over the event channel
//           2. Pause, resume and stop it
//           3. Retry an operation after the stop
// @tc.expect: Replies track the session state machine, stopped stays terminal
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_manage_session_lifecycle() {
    crate::test_init();
    let (events, _events_rx) = event_channel();
    // Spawn the loop onto the shared runtime; blocking replies must happen
    // outside the entered context.
    let tx = {
        let _enter = RUNTIME.enter();
        MirrorManager::init(Arc::new(permissive_graphics()), events)
    };

    let session_id = tx
        .start_capture(
            CaptureTarget::WholeDisplay { display_id: 0 },
            Size::new(50, 50),
            ScalingPolicy::FitCenter,
        )
        .unwrap();
    assert_eq!(tx.query_state(session_id), Ok(SessionState::Recording));

    assert_eq!(tx.pause(session_id), ErrorCode::ErrOk);
    assert_eq!(tx.query_state(session_id), Ok(SessionState::Paused));
    assert_eq!(tx.resume(session_id), ErrorCode::ErrOk);
    assert_eq!(tx.stop(session_id), ErrorCode::ErrOk);
    assert_eq!(tx.pause(session_id), ErrorCode::SessionStopped);
    assert_eq!(tx.query_state(session_id), Ok(SessionState::Stopped));
    assert_eq!(tx.query_state(9999), Err(ErrorCode::SessionNotFound));
}

// @tc.name: ut_manage_stale_bounds_dropped
// @tc.desc: Test generation filtering of asynchronous bounds changes
// @tc.precon: NA
// @tc.step: 1. Start a session at generation zero
//           2. Report bounds carrying a stale generation, then the live one
// @tc.expect: Only the live-generation change resizes the content
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_manage_stale_bounds_dropped() {
    crate::test_init();
    let (events, mut events_rx) = event_channel();
    let tx = {
        let _enter = RUNTIME.enter();
        MirrorManager::init(Arc::new(permissive_graphics()), events)
    };

    let session_id = tx
        .start_capture(
            CaptureTarget::WholeDisplay { display_id: 0 },
            Size::new(50, 50),
            ScalingPolicy::FitCenter,
        )
        .unwrap();

    let grown = Rect::new(0, 0, 300, 300);
    tx.notify_bounds_changed(session_id, grown, 5);
    // A blocking query flushes everything queued before it.
    let _ = tx.query_state(session_id);
    assert!(events_rx.try_recv().is_err());

    tx.notify_bounds_changed(session_id, grown, 0);
    let _ = tx.query_state(session_id);
    assert_eq!(
        events_rx.try_recv(),
        Ok(MirrorEvent::ContentResized {
            session_id,
            width: 300,
            height: 300,
        })
    );
}

// @tc.name: ut_manage_rotation_flow
// @tc.desc: Test rotation transitions driven through the manager loop
// @tc.precon: NA
// @tc.step: 1. Begin a rotation transition and build its animation
//           2. Report a frame past the animation duration
//           3. Try to build the animation again
// @tc.expect: The transition completes on the final frame and is forgotten
// @tc.type: FUNC
// @tc.require: issues#ICN31I
#[test]
fn ut_manage_rotation_flow() {
    crate::test_init();
    let (events, _events_rx) = event_channel();
    let tx = {
        let _enter = RUNTIME.enter();
        MirrorManager::init(Arc::new(permissive_graphics()), events)
    };

    let change = TransitionChange {
        start_bounds: CONTENT,
        end_bounds: Rect::new(0, 0, 200, 100),
        start_rotation: Rotation::R0,
        end_rotation: Rotation::R90,
        snapshot: None,
        snapshot_luma: None,
        anim_hint: AnimationHint::Rotate,
    };
    let handle = tx.begin_rotation(change).unwrap();
    let animation = tx.build_rotation_animation(handle, 1.0).unwrap();
    assert_eq!(animation.total_duration(), Duration::from_millis(500));

    tx.rotation_frame(handle, Duration::from_millis(600));
    assert!(tx.build_rotation_animation(handle, 1.0).is_none());

    // Cancelling an already finished transition is a harmless no-op.
    tx.cancel_rotation(handle);
    assert!(tx.build_rotation_animation(handle, 1.0).is_none());
}
