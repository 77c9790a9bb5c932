use serde::Serialize;

use crate::error::PestError;
use crate::inference::labels::{NUM_CLASSES, PestClass};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub class: PestClass,
    /// Percentage, `100 × max(probabilities)`.
    pub confidence: f32,
    pub probabilities: Vec<f32>,
}

impl Prediction {
    /// Arg-max over a softmax output. Ties go to the lowest index.
    pub fn from_probabilities(probabilities: Vec<f32>) -> Result<Self, PestError> {
        if probabilities.len() != NUM_CLASSES {
            return Err(PestError::Inference(format!(
                "expected {NUM_CLASSES} outputs, model produced {}",
                probabilities.len()
            )));
        }
        if probabilities.iter().any(|p| p.is_nan()) {
            return Err(PestError::Inference("model output contains NaN".into()));
        }

        let (index, max) = probabilities.iter().copied().enumerate().fold(
            (0usize, f32::NEG_INFINITY),
            |(best_i, best), (i, p)| if p > best { (i, p) } else { (best_i, best) },
        );
        let class = PestClass::from_index(index)
            .ok_or_else(|| PestError::Inference(format!("no label for index {index}")))?;

        Ok(Self {
            class,
            confidence: max * 100.0,
            probabilities,
        })
    }

    /// Same as [`Self::from_probabilities`] for graphs exported without
    /// their final softmax.
    pub fn from_logits(logits: Vec<f32>) -> Result<Self, PestError> {
        Self::from_probabilities(softmax(&logits))
    }

    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence)
    }
}

pub fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
