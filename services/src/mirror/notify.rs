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

//! Event stream delivered to capture session owners.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Events emitted to the client owning a capture session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MirrorEvent {
    /// The mirrored content became visible or hidden. Emitted at most once
    /// per actual transition.
    VisibilityChanged {
        /// Session the event belongs to.
        session_id: u32,
        /// New visibility of the mirrored content.
        visible: bool,
    },
    /// The mirrored content changed size.
    ContentResized {
        /// Session the event belongs to.
        session_id: u32,
        /// New content width in pixels.
        width: u32,
        /// New content height in pixels.
        height: u32,
    },
}

/// Creates the event channel connecting the mirror to its owning client.
pub fn event_channel() -> (EventSender, UnboundedReceiver<MirrorEvent>) {
    let (tx, rx) = unbounded_channel();
    (EventSender { tx }, rx)
}

/// Sending half of the client event stream.
#[derive(Clone)]
pub struct EventSender {
    tx: UnboundedSender<MirrorEvent>,
}

impl EventSender {
    pub(crate) fn visibility_changed(&self, session_id: u32, visible: bool) {
        self.send(MirrorEvent::VisibilityChanged {
            session_id,
            visible,
        });
    }

    pub(crate) fn content_resized(&self, session_id: u32, width: u32, height: u32) {
        self.send(MirrorEvent::ContentResized {
            session_id,
            width,
            height,
        });
    }

    fn send(&self, event: MirrorEvent) {
        if self.tx.send(event).is_err() {
            info!("mirror client receiver dropped, event discarded");
        }
    }
}
