use crate::config::Config;
use crate::device_camera::interface::FrameSource;
use crate::device_orientation::interface::OrientationSensor;
use crate::image_classifier::interface::{Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use crate::library::worker_pool::WorkerPool;
use crate::scene::anchor::label_anchor;
use crate::scene::interface::RenderSurface;
use crate::tap_coordinator::core::{
    init, transition, ClassifyOutcome, Effect, Event, RequestId, State,
};
use crate::tap_coordinator::run_effect::RunEffect;
use std::cell::RefCell;
use std::rc::Weak;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Lives on the rendering thread. Holds the surface weakly so it never keeps
/// the view alive, and is the only place scene anchors are changed.
pub struct TapCoordinator {
    config: Config,
    logger: Arc<dyn Logger + Send + Sync>,
    surface: Weak<RefCell<dyn RenderSurface>>,
    frame_source: Arc<dyn FrameSource + Send + Sync>,
    orientation_sensor: Arc<dyn OrientationSensor + Send + Sync>,
    run_effect: RunEffect,
    outcome_receiver: Receiver<ClassifyOutcome>,
    state: State,
}

impl TapCoordinator {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        surface: Weak<RefCell<dyn RenderSurface>>,
        frame_source: Arc<dyn FrameSource + Send + Sync>,
        orientation_sensor: Arc<dyn OrientationSensor + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let logger = logger.with_namespace("tap_coordinator");
        let (outcome_sender, outcome_receiver) = channel();
        let run_effect = RunEffect::new(
            logger.with_namespace("worker"),
            image_classifier,
            WorkerPool::new(config.worker_threads)?,
            outcome_sender,
        );

        Ok(Self {
            config,
            logger,
            surface,
            frame_source,
            orientation_sensor,
            run_effect,
            outcome_receiver,
            state: init(),
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    #[allow(dead_code)]
    pub fn classification(&self) -> &str {
        &self.state.classification
    }

    pub fn on_tap(&mut self) {
        if self.surface.upgrade().is_none() {
            return;
        }

        let frame = self.frame_source.current_frame();
        let orientation = self.orientation_sensor.orientation();
        self.handle_event(Event::Tapped { frame, orientation });
    }

    #[allow(dead_code)]
    pub fn process_classifications(
        &mut self,
        request: RequestId,
        classifications: Vec<Classification>,
    ) {
        self.apply_outcome(ClassifyOutcome {
            request,
            result: Ok(classifications),
        });
    }

    /// Applies every finished classification without blocking. Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(outcome) = self.outcome_receiver.try_recv() {
            self.apply_outcome(outcome);
            handled += 1;
        }
        handled
    }

    /// Blocks until `count` results were applied or `timeout` passed.
    #[allow(dead_code)]
    pub fn pump_until(&mut self, count: usize, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut handled = 0;

        while handled < count {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.outcome_receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.apply_outcome(outcome);
                    handled += 1;
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        handled
    }

    fn apply_outcome(&mut self, outcome: ClassifyOutcome) {
        let surface_alive = self.surface.upgrade().is_some();
        self.handle_event(Event::ClassifyDone {
            request: outcome.request,
            result: outcome.result,
            surface_alive,
        });
    }

    fn handle_event(&mut self, event: Event) {
        let state = std::mem::take(&mut self.state);
        let (new_state, effects) = transition(&self.config, state, event);
        self.state = new_state;
        self.run_effects(effects);
    }

    fn run_effects(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            let _ = self
                .logger
                .info(&format!("Running effect: {}", effect.to_display_string()));

            match effect {
                Effect::ClassifyFrame {
                    request,
                    frame,
                    orientation,
                } => self.run_effect.classify_frame(request, frame, orientation),
                Effect::ReplaceLabel { label, identifier } => {
                    self.replace_label(&label, &identifier)
                }
                Effect::DropStaleResult { request, latest } => {
                    let _ = self.logger.info(&format!(
                        "Dropping result of request {}, request {} is newer",
                        request, latest
                    ));
                }
            }
        }
    }

    fn replace_label(&self, label: &str, identifier: &str) {
        let Some(surface) = self.surface.upgrade() else {
            return;
        };
        let mut surface = surface.borrow_mut();

        surface.clear_anchors();

        let _ = self
            .logger
            .info(&format!("Elements detected: {}", identifier));

        surface.add_anchor(label_anchor(label, &self.config.label_style));
    }
}
