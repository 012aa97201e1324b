use crate::device_camera::impl_synthetic::SyntheticCameraConfig;
use crate::image_classifier::models::model_config::ModelConfig;
use crate::scene::anchor::LabelStyle;
use chrono::Offset;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StaleResultPolicy {
    /// Results are applied in the order their callbacks arrive.
    #[default]
    LastCallbackWins,
    /// Results of a request older than the latest dispatched one are dropped.
    LatestRequestWins,
}

#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub synthetic: SyntheticCameraConfig,
    /// When set, the feed shows this image instead of the synthetic pattern.
    pub still_image_path: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub worker_threads: usize,
    pub logger_timezone: chrono::FixedOffset,
    pub stale_result_policy: StaleResultPolicy,
    pub label_style: LabelStyle,
    pub model: ModelConfig,
    pub camera: CameraConfig,
    pub repaint_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            logger_timezone: utc(),
            stale_result_policy: StaleResultPolicy::default(),
            label_style: LabelStyle::default(),
            model: ModelConfig::default(),
            camera: CameraConfig {
                synthetic: SyntheticCameraConfig::default(),
                still_image_path: None,
            },
            repaint_interval: Duration::from_millis(33),
        }
    }
}

fn utc() -> chrono::FixedOffset {
    chrono::Utc.fix()
}
