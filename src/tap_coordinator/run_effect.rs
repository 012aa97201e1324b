use crate::device_camera::interface::Frame;
use crate::device_orientation::interface::ImageOrientation;
use crate::image_classifier::interface::ImageClassifier;
use crate::library::logger::interface::Logger;
use crate::library::worker_pool::WorkerPool;
use crate::tap_coordinator::core::{ClassifyOutcome, RequestId};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Runs classification off the rendering thread and reports back over `outcome_sender`.
pub struct RunEffect {
    logger: Arc<dyn Logger + Send + Sync>,
    image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
    worker_pool: WorkerPool,
    outcome_sender: Sender<ClassifyOutcome>,
}

impl RunEffect {
    pub fn new(
        logger: Arc<dyn Logger + Send + Sync>,
        image_classifier: Arc<dyn ImageClassifier + Send + Sync>,
        worker_pool: WorkerPool,
        outcome_sender: Sender<ClassifyOutcome>,
    ) -> Self {
        Self {
            logger,
            image_classifier,
            worker_pool,
            outcome_sender,
        }
    }

    pub fn classify_frame(&self, request: RequestId, frame: Frame, orientation: ImageOrientation) {
        let logger = self.logger.clone();
        let image_classifier = self.image_classifier.clone();
        let outcome_sender = self.outcome_sender.clone();

        let submitted = self.worker_pool.submit(move || {
            let result = image_classifier.classify(&frame.image, orientation);

            if let Err(e) = &result {
                let _ = logger.error(&format!(
                    "Error trying to perform the classification request {}. Details: {}",
                    request, e
                ));
            }

            // Receiver gone means the coordinator was torn down
            let _ = outcome_sender.send(ClassifyOutcome { request, result });
        });

        if let Err(e) = submitted {
            let _ = self.logger.error(&format!(
                "Could not dispatch classification request {}. Details: {}",
                request, e
            ));
            let _ = self.outcome_sender.send(ClassifyOutcome {
                request,
                result: Err(e),
            });
        }
    }
}
