use crate::{
    core::FrameIndex,
    error::{VitrineError, VitrineResult},
};

/// Pointer, wheel, and window signals, normalized to stage pixels. Scripts
/// feed these to the director at fixed tick indices, which makes an entire
/// session replayable.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum InputEvent {
    PointerMoved { x: f64, y: f64 },
    Wheel { delta_y: f64 },
    Click { x: f64, y: f64 },
    Resized { width: u32, height: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptedEvent {
    pub frame: FrameIndex,
    pub event: InputEvent,
}

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct InputScript {
    pub events: Vec<ScriptedEvent>,
}

impl InputScript {
    pub fn validate(&self) -> VitrineResult<()> {
        for pair in self.events.windows(2) {
            if pair[1].frame < pair[0].frame {
                return Err(VitrineError::validation(
                    "script events must be ordered by frame",
                ));
            }
        }
        Ok(())
    }

    /// Events scheduled for exactly this tick, in script order.
    pub fn events_at(&self, frame: FrameIndex) -> impl Iterator<Item = InputEvent> + '_ {
        self.events
            .iter()
            .filter(move |e| e.frame == frame)
            .map(|e| e.event)
    }

    pub fn last_frame(&self) -> Option<FrameIndex> {
        self.events.last().map(|e| e.frame)
    }
}
