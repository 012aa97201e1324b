use crate::device_orientation::interface::ImageOrientation;
use crate::image_classifier::interface::{sort_by_confidence, Classification, ImageClassifier};
use crate::image_classifier::labels::load_labels;
use crate::image_classifier::tract::image::prepare_input;
use crate::library::logger::interface::Logger;
use image::DynamicImage;
use std::sync::{Arc, Mutex};
use tract_onnx::prelude::*;

use super::models::model_config::ModelConfig;

type Plan = SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>;

struct LoadedModel {
    plan: Plan,
    labels: Vec<String>,
}

/// MobileNet style classifier. The model is loaded on the first request, so a
/// missing model only fails that request.
pub struct ImageClassifierTractOnnx {
    config: ModelConfig,
    loaded: Mutex<Option<Arc<LoadedModel>>>,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl ImageClassifierTractOnnx {
    pub fn new(config: ModelConfig, logger: Arc<dyn Logger + Send + Sync>) -> Self {
        Self {
            config,
            loaded: Mutex::new(None),
            logger: logger
                .with_namespace("image_classifier")
                .with_namespace("tract_onnx"),
        }
    }

    fn model(&self) -> Result<Arc<LoadedModel>, Box<dyn std::error::Error + Send + Sync>> {
        let mut loaded = self.loaded.lock().map_err(|_| "model lock poisoned")?;
        if let Some(model) = loaded.as_ref() {
            return Ok(model.clone());
        }

        self.logger
            .info(&format!("Loading model {}", self.config.onnx_model_path))?;

        let (height, width) = self.config.input_shape;
        let plan = tract_onnx::onnx()
            .model_for_path(&self.config.onnx_model_path)?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(
                    f32::datum_type(),
                    tvec!(1, 3, height as usize, width as usize),
                ),
            )?
            .into_optimized()?
            .into_runnable()?;
        let labels = load_labels(&self.config.labels_path)?;

        let model = Arc::new(LoadedModel { plan, labels });
        *loaded = Some(model.clone());

        self.logger.info("Model loaded")?;
        Ok(model)
    }
}

/// Scores straight out of the network may be logits; turn them into probabilities.
pub fn to_probabilities(scores: &[f32]) -> Vec<f32> {
    let sum: f32 = scores.iter().sum();
    let already_probabilities =
        scores.iter().all(|s| (0.0..=1.0).contains(s)) && (sum - 1.0).abs() < 1e-3;
    if already_probabilities {
        return scores.to_vec();
    }

    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

pub fn top_classifications(
    probabilities: &[f32],
    labels: &[String],
    top_k: usize,
) -> Vec<Classification> {
    let mut classifications: Vec<Classification> = probabilities
        .iter()
        .enumerate()
        .map(|(index, &confidence)| Classification {
            label: labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("class {}", index)),
            confidence,
        })
        .collect();

    sort_by_confidence(&mut classifications);
    classifications.truncate(top_k);
    classifications
}

impl ImageClassifier for ImageClassifierTractOnnx {
    fn classify(
        &self,
        image: &DynamicImage,
        orientation: ImageOrientation,
    ) -> Result<Vec<Classification>, Box<dyn std::error::Error + Send + Sync>> {
        let model = self.model()?;

        let (height, width) = self.config.input_shape;
        let input = prepare_input(image, orientation, width, height)?;

        let outputs = model.plan.run(tvec!(input.into_tvalue()))?;
        let output = outputs
            .first()
            .ok_or("model produced no outputs")?
            .to_array_view::<f32>()?;
        let scores: Vec<f32> = output.iter().copied().collect();

        Ok(top_classifications(
            &to_probabilities(&scores),
            &model.labels,
            self.config.top_k,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::logger::impl_memory::LoggerMemory;

    #[test]
    fn test_missing_model_fails_the_request() {
        let classifier = ImageClassifierTractOnnx::new(
            ModelConfig {
                onnx_model_path: "./no/such/model.onnx".to_string(),
                ..ModelConfig::default()
            },
            Arc::new(LoggerMemory::new()),
        );

        let result = classifier.classify(&DynamicImage::new_rgb8(8, 8), ImageOrientation::Up);
        assert!(result.is_err());
    }

    #[test]
    fn test_logits_become_probabilities() {
        let probabilities = to_probabilities(&[2.0, 1.0, 0.1]);
        let sum: f32 = probabilities.iter().sum();

        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probabilities[0] > probabilities[1]);
        assert!(probabilities[1] > probabilities[2]);
    }

    #[test]
    fn test_probabilities_pass_through() {
        assert_eq!(to_probabilities(&[0.7, 0.2, 0.1]), vec![0.7, 0.2, 0.1]);
    }

    #[test]
    fn test_top_classifications_ranked_and_truncated() {
        let labels = vec![
            "whale".to_string(),
            "golden retriever, dog".to_string(),
            "tabby, tabby cat".to_string(),
        ];

        let top = top_classifications(&[0.1, 0.6, 0.3], &labels, 2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].label, "golden retriever, dog");
        assert_eq!(top[1].label, "tabby, tabby cat");
    }

    #[test]
    fn test_unlabelled_index_gets_placeholder() {
        let top = top_classifications(&[0.2, 0.8], &["whale".to_string()], 1);
        assert_eq!(top[0].label, "class 1");
    }
}
