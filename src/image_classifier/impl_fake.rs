use crate::device_orientation::interface::ImageOrientation;
use crate::image_classifier::interface::{sort_by_confidence, Classification, ImageClassifier};
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use rand::distr::{Distribution, Uniform};
use std::sync::{Arc, Mutex};

const OBJECTS: [&str; 16] = [
    "golden retriever, dog",
    "tabby, tabby cat",
    "coffee mug",
    "laptop, laptop computer",
    "desk",
    "potted plant",
    "water bottle",
    "computer keyboard, keypad",
    "mouse, computer mouse",
    "wall clock",
    "studio couch, day bed",
    "banana",
    "remote control, remote",
    "sunglasses, dark glasses, shades",
    "whale",
    "backpack, back pack, knapsack",
];

/// Random ranked labels, or a scripted response when one is set.
pub struct ImageClassifierFake {
    scripted: Mutex<Option<Result<Vec<Classification>, String>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierFake {
    pub fn new(logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            scripted: Mutex::new(None),
            logger: logger.with_namespace("image_classifier").with_namespace("fake"),
        }
    }

    #[allow(dead_code)]
    pub fn respond_with(&self, response: Result<Vec<Classification>, String>) {
        if let Ok(mut scripted) = self.scripted.lock() {
            *scripted = Some(response);
        }
    }

    fn random_classifications(
        &self,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let mut rng = rand::rng();
        let index_dist = Uniform::new(0, OBJECTS.len())?;
        let confidence_dist = Uniform::new(0.0f32, 1.0)?;

        let mut classifications: Vec<Classification> = (0..3)
            .map(|_| Classification {
                label: OBJECTS[index_dist.sample(&mut rng)].to_string(),
                confidence: confidence_dist.sample(&mut rng),
            })
            .collect();
        sort_by_confidence(&mut classifications);

        Ok(classifications)
    }
}

impl ImageClassifier for ImageClassifierFake {
    fn classify(
        &self,
        image: &DynamicImage,
        orientation: ImageOrientation,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        self.logger.info(&format!(
            "Classifying {}x{} image ({:?})",
            image.width(),
            image.height(),
            orientation
        ))?;

        let scripted = self
            .scripted
            .lock()
            .map_err(|_| "scripted response lock poisoned")?
            .clone();

        match scripted {
            Some(Ok(classifications)) => Ok(classifications),
            Some(Err(message)) => Err(message.into()),
            None => self.random_classifications(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_memory::LoggerMemory;

    fn image() -> DynamicImage {
        DynamicImage::new_rgb8(4, 4)
    }

    #[test]
    fn test_random_results_are_ranked() {
        let classifier = ImageClassifierFake::new(Arc::new(LoggerMemory::new()));
        let results = classifier.classify(&image(), ImageOrientation::Up).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results
            .windows(2)
            .all(|pair| pair[0].confidence >= pair[1].confidence));
    }

    #[test]
    fn test_scripted_failure() {
        let classifier = ImageClassifierFake::new(Arc::new(LoggerMemory::new()));
        classifier.respond_with(Err("model missing".to_string()));

        let error = classifier
            .classify(&image(), ImageOrientation::Right)
            .unwrap_err();
        assert_eq!(error.to_string(), "model missing");
    }
}
