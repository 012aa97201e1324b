use image::DynamicImage;
use std::sync::Arc;
use std::time::Instant;

/// One captured camera image. Clones share the pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub id: u64,
    pub image: Arc<DynamicImage>,
    pub captured_at: Instant,
}

impl Frame {
    pub fn new(id: u64, image: DynamicImage) -> Self {
        Self {
            id,
            image: Arc::new(image),
            captured_at: Instant::now(),
        }
    }
}

pub trait FrameSource {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    #[allow(dead_code)]
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
    /// Latest frame, or `None` while tracking has not started or is paused.
    fn current_frame(&self) -> Option<Frame>;
}
