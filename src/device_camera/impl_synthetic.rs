use crate::device_camera::interface::{Frame, FrameSource};
use crate::library::logger::interface::Logger;
use image::{DynamicImage, Rgb, RgbImage};
use rand::Rng;
use std::sync::mpsc::{channel, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SyntheticCameraConfig {
    pub width: u32,
    pub height: u32,
    pub frame_interval: Duration,
    /// Delay before the first frame, like a tracking session warming up.
    pub warmup_delay: Duration,
}

impl Default for SyntheticCameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            frame_interval: Duration::from_millis(33),
            warmup_delay: Duration::from_millis(500),
        }
    }
}

/// Produces a moving pattern on a background thread so the feed looks alive.
pub struct FrameSourceSynthetic {
    config: SyntheticCameraConfig,
    latest: Arc<Mutex<Option<Frame>>>,
    capture_thread: Mutex<Option<JoinHandle<()>>>,
    shutdown_tx: Mutex<Option<Sender<()>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl FrameSourceSynthetic {
    pub fn new(config: SyntheticCameraConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            latest: Arc::new(Mutex::new(None)),
            capture_thread: Mutex::new(None),
            shutdown_tx: Mutex::new(None),
            logger: logger.with_namespace("camera").with_namespace("synthetic"),
        }
    }
}

pub fn render_pattern(width: u32, height: u32, tick: u64, rng: &mut impl Rng) -> DynamicImage {
    let shift = (tick * 3) as u32;
    let image = RgbImage::from_fn(width, height, |x, y| {
        let noise: u8 = rng.random_range(0..16);
        let r = ((x + shift) % 256) as u8;
        let g = ((y + shift / 2) % 256) as u8;
        let b = (((x + y) / 2 + shift) % 256) as u8;
        Rgb([
            r.saturating_add(noise),
            g.saturating_add(noise),
            b.saturating_add(noise),
        ])
    });
    DynamicImage::ImageRgb8(image)
}

impl FrameSource for FrameSourceSynthetic {
    fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let mut capture_thread = self
            .capture_thread
            .lock()
            .map_err(|_| "capture thread lock poisoned")?;
        if capture_thread.is_some() {
            return Ok(());
        }

        self.logger.info("Starting camera...")?;

        let (shutdown_tx, shutdown_rx) = channel::<()>();
        let latest = self.latest.clone();
        let config = self.config.clone();

        let handle = std::thread::Builder::new()
            .name("synthetic-camera".to_string())
            .spawn(move || {
                if shutdown_rx.recv_timeout(config.warmup_delay).is_ok() {
                    return;
                }

                let mut rng = rand::rng();
                let mut tick = 0u64;
                loop {
                    let image = render_pattern(config.width, config.height, tick, &mut rng);
                    if let Ok(mut latest) = latest.lock() {
                        *latest = Some(Frame::new(tick, image));
                    }
                    tick += 1;

                    // Any message or a dropped sender stops capture
                    match shutdown_rx.recv_timeout(config.frame_interval) {
                        Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,
                        _ => break,
                    }
                }
            })?;

        *capture_thread = Some(handle);
        *self
            .shutdown_tx
            .lock()
            .map_err(|_| "shutdown lock poisoned")? = Some(shutdown_tx);

        self.logger.info("Camera started")?;
        Ok(())
    }

    /// No-op when capture is not running.
    fn stop(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let handle = self
            .capture_thread
            .lock()
            .map_err(|_| "capture thread lock poisoned")?
            .take();
        let Some(handle) = handle else {
            return Ok(());
        };

        self.logger.info("Stopping camera...")?;

        if let Some(tx) = self
            .shutdown_tx
            .lock()
            .map_err(|_| "shutdown lock poisoned")?
            .take()
        {
            let _ = tx.send(());
        }
        let _ = handle.join();

        if let Ok(mut latest) = self.latest.lock() {
            *latest = None;
        }

        self.logger.info("Camera stopped")?;
        Ok(())
    }

    fn current_frame(&self) -> Option<Frame> {
        self.latest.lock().ok().and_then(|latest| latest.clone())
    }
}

impl Drop for FrameSourceSynthetic {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            eprintln!("Failed to stop camera during shutdown: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_memory::LoggerMemory;
    use std::time::Instant;

    fn fast_config() -> SyntheticCameraConfig {
        SyntheticCameraConfig {
            width: 32,
            height: 24,
            frame_interval: Duration::from_millis(5),
            warmup_delay: Duration::from_millis(0),
        }
    }

    #[test]
    fn test_no_frame_until_started() {
        let camera = FrameSourceSynthetic::new(fast_config(), Arc::new(LoggerMemory::new()));
        assert!(camera.current_frame().is_none());
    }

    #[test]
    fn test_produces_frames_after_start_and_none_after_stop() {
        let camera = FrameSourceSynthetic::new(fast_config(), Arc::new(LoggerMemory::new()));
        camera.start().unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let frame = loop {
            if let Some(frame) = camera.current_frame() {
                break frame;
            }
            assert!(Instant::now() < deadline, "camera never produced a frame");
            std::thread::sleep(Duration::from_millis(5));
        };
        assert_eq!(frame.image.width(), 32);
        assert_eq!(frame.image.height(), 24);

        camera.stop().unwrap();
        assert!(camera.current_frame().is_none());
    }

    #[test]
    fn test_stop_only_runs_once() {
        let logger = LoggerMemory::new();
        let camera = FrameSourceSynthetic::new(fast_config(), Arc::new(logger.clone()));

        camera.stop().unwrap();
        camera.start().unwrap();
        camera.stop().unwrap();
        drop(camera);

        let stopped = logger
            .lines()
            .iter()
            .filter(|line| line.message == "Camera stopped")
            .count();
        assert_eq!(stopped, 1);
    }

    #[test]
    fn test_render_pattern_size() {
        let image = render_pattern(10, 7, 3, &mut rand::rng());
        assert_eq!((image.width(), image.height()), (10, 7));
    }
}
