use crate::device_camera::interface::{Frame, FrameSource};
use std::sync::Mutex;

/// Serves whatever frame was last handed to it.
#[derive(Default)]
pub struct FrameSourceFake {
    frame: Mutex<Option<Frame>>,
}

impl FrameSourceFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_frame(&self, frame: Option<Frame>) {
        if let Ok(mut current) = self.frame.lock() {
            *current = frame;
        }
    }
}

impl FrameSource for FrameSourceFake {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.set_frame(None);
        Ok(())
    }

    fn current_frame(&self) -> Option<Frame> {
        self.frame.lock().ok().and_then(|frame| frame.clone())
    }
}
