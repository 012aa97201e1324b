use config::Config;
use device_camera::impl_still_image::FrameSourceStillImage;
use device_camera::impl_synthetic::FrameSourceSynthetic;
use device_camera::interface::FrameSource;
use device_orientation::impl_fake::OrientationSensorFake;
use device_orientation::interface::DeviceOrientation;
use image_classifier::impl_fake::ImageClassifierFake;
use image_classifier::impl_tract_onnx::ImageClassifierTractOnnx;
use image_classifier::interface::ImageClassifier;
use library::logger::impl_console::LoggerConsole;
use library::logger::interface::Logger;
use std::path::Path;
use std::sync::Arc;

mod config;
mod device_camera;
mod device_orientation;
mod image_classifier;
mod library;
mod scene;
mod tap_coordinator;

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = Config::default();

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let frame_source: Arc<dyn FrameSource + Send + Sync> = match &config.camera.still_image_path {
        Some(path) => Arc::new(FrameSourceStillImage::new(path, logger.clone())),
        None => Arc::new(FrameSourceSynthetic::new(
            config.camera.synthetic.clone(),
            logger.clone(),
        )),
    };
    frame_source.start()?;

    let image_classifier: Arc<dyn ImageClassifier + Send + Sync> =
        if Path::new(&config.model.onnx_model_path).exists() {
            Arc::new(ImageClassifierTractOnnx::new(
                config.model.clone(),
                logger.clone(),
            ))
        } else {
            logger.info(&format!(
                "No model at {}, using fake classifier",
                config.model.onnx_model_path
            ))?;
            Arc::new(ImageClassifierFake::new(logger.clone()))
        };

    let orientation_sensor = Arc::new(OrientationSensorFake::new(DeviceOrientation::Portrait));

    scene::impl_gui::run(
        config,
        logger,
        frame_source.clone(),
        orientation_sensor,
        image_classifier,
    )?;

    frame_source.stop()?;

    Ok(())
}
