use crate::device_orientation::interface::ImageOrientation;
use image::DynamicImage;

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub label: String,
    pub confidence: f32,
}

pub trait ImageClassifier {
    /// Ranked by confidence, highest first.
    fn classify(
        &self,
        image: &DynamicImage,
        orientation: ImageOrientation,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>>;
}

pub fn sort_by_confidence(classifications: &mut [Classification]) {
    classifications.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}
