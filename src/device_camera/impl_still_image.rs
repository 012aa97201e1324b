use crate::device_camera::interface::{Frame, FrameSource};
use crate::library::logger::interface::Logger;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Camera that keeps showing one image loaded from disk.
pub struct FrameSourceStillImage {
    path: PathBuf,
    image: Mutex<Option<Frame>>,
    started: AtomicBool,
    next_id: AtomicU64,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSourceStillImage {
    pub fn new(path: impl Into<PathBuf>, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            path: path.into(),
            image: Mutex::new(None),
            started: AtomicBool::new(false),
            next_id: AtomicU64::new(0),
            logger: logger.with_namespace("camera").with_namespace("still_image"),
        }
    }
}

impl FrameSource for FrameSourceStillImage {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.logger
            .info(&format!("Loading still image {}", self.path.display()))?;
        let image = image::open(&self.path)?;
        let mut current = self.image.lock().map_err(|_| "still image lock poisoned")?;
        *current = Some(Frame::new(0, image));
        self.started.store(true, Ordering::SeqCst);
        self.logger.info("Camera started")?;
        Ok(())
    }

    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.started.store(false, Ordering::SeqCst);
        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn current_frame(&self) -> Option<Frame> {
        if !self.started.load(Ordering::SeqCst) {
            return None;
        }

        let current = self.image.lock().ok()?;
        current.as_ref().map(|frame| Frame {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            image: frame.image.clone(),
            captured_at: std::time::Instant::now(),
        })
    }
}
