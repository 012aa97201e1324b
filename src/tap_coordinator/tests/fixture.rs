use crate::config::Config;
use crate::device_camera::{impl_fake::FrameSourceFake, interface::Frame};
use crate::device_orientation::impl_fake::OrientationSensorFake;
use crate::device_orientation::interface::{DeviceOrientation, ImageOrientation};
use crate::image_classifier::impl_fake::ImageClassifierFake;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::impl_memory::LoggerMemory;
use crate::scene::impl_memory::Scene;
use crate::scene::interface::RenderSurface;
use crate::tap_coordinator::main::TapCoordinator;
use image::DynamicImage;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[allow(dead_code)]
pub struct Fixture {
    pub config: Config,
    pub logger: LoggerMemory,
    pub scene: Rc<RefCell<Scene>>,
    pub frame_source: Arc<FrameSourceFake>,
    pub orientation_sensor: Arc<OrientationSensorFake>,
    pub image_classifier: Arc<ImageClassifierFake>,
    pub coordinator: TapCoordinator,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        let logger = LoggerMemory::new();
        let image_classifier = Arc::new(ImageClassifierFake::new(Arc::new(logger.clone())));
        Self::build(config, logger, image_classifier.clone(), image_classifier)
    }

    pub fn with_classifier(
        config: Config,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    ) -> Self {
        let logger = LoggerMemory::new();
        let unused = Arc::new(ImageClassifierFake::new(Arc::new(logger.clone())));
        Self::build(config, logger, unused, image_classifier)
    }

    fn build(
        config: Config,
        logger: LoggerMemory,
        fake_classifier: Arc<ImageClassifierFake>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    ) -> Self {
        let scene = Rc::new(RefCell::new(Scene::new()));
        let frame_source = Arc::new(FrameSourceFake::new());
        let orientation_sensor = Arc::new(OrientationSensorFake::new(DeviceOrientation::Portrait));

        let surface: Rc<RefCell<dyn RenderSurface>> = scene.clone();
        let coordinator = TapCoordinator::new(
            config.clone(),
            Arc::new(logger.clone()),
            Rc::downgrade(&surface),
            frame_source.clone(),
            orientation_sensor.clone(),
            image_classifier,
        )
        .unwrap();

        Self {
            config,
            logger,
            scene,
            frame_source,
            orientation_sensor,
            image_classifier: fake_classifier,
            coordinator,
        }
    }

    pub fn show_frame(&self, id: u64) {
        self.frame_source.set_frame(Some(frame(id)));
    }

    pub fn labels(&self) -> Vec<String> {
        self.scene
            .borrow()
            .anchors()
            .iter()
            .flat_map(|anchor| anchor.texts().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    pub fn anchor_count(&self) -> usize {
        self.scene.borrow().anchors().len()
    }

    /// Drops the only strong reference to the scene the coordinator points at.
    pub fn tear_down_surface(&mut self) {
        self.scene = Rc::new(RefCell::new(Scene::new()));
    }
}

const FRAME_BASE_WIDTH: u32 = 16;
const GATE_TIMEOUT: Duration = Duration::from_secs(10);

/// The id is encoded in the width so classifiers can tell frames apart.
pub fn frame(id: u64) -> Frame {
    Frame::new(id, DynamicImage::new_rgb8(FRAME_BASE_WIDTH + id as u32, 12))
}

fn frame_id(image: &DynamicImage) -> usize {
    image.width().saturating_sub(FRAME_BASE_WIDTH) as usize
}

pub fn classification(label: &str, confidence: f32) -> Classification {
    Classification {
        label: label.to_string(),
        confidence,
    }
}

/// Classifying frame `n` blocks until gate `n` opens, then returns label `n`.
pub struct GatedClassifier {
    calls: AtomicUsize,
    gates: Vec<Mutex<Receiver<()>>>,
    labels: Vec<String>,
}

impl GatedClassifier {
    pub fn new(labels: &[&str]) -> (Self, Vec<Sender<()>>) {
        let (senders, gates): (Vec<_>, Vec<_>) = labels
            .iter()
            .map(|_| {
                let (tx, rx) = channel();
                (tx, Mutex::new(rx))
            })
            .unzip();

        (
            Self {
                calls: AtomicUsize::new(0),
                gates,
                labels: labels.iter().map(|label| label.to_string()).collect(),
            },
            senders,
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageClassifier for GatedClassifier {
    fn classify(
        &self,
        image: &DynamicImage,
        _orientation: ImageOrientation,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let id = frame_id(image);
        let gate = self.gates.get(id).ok_or("unexpected frame")?;
        gate.lock()
            .map_err(|_| "gate lock poisoned")?
            .recv_timeout(GATE_TIMEOUT)
            .map_err(|_| "gate never opened")?;

        Ok(vec![classification(&self.labels[id], 0.9)])
    }
}
