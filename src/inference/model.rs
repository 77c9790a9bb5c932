use std::path::Path;
use tract_onnx::prelude::*;
use tracing::info;

use crate::error::PestError;
use crate::inference::preprocess::ImageTensor;

/// A frozen classifier: one NHWC image in, one score per class out.
pub trait PestModel: Send + Sync {
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, PestError>;
}

type Plan = TypedSimplePlan<TypedModel>;

/// ONNX export of the trained network, executed with tract.
pub struct OnnxPestModel {
    plan: Plan,
    size: u32,
}

impl OnnxPestModel {
    pub fn load(path: &Path, size: u32) -> Result<Self, PestError> {
        let side = size as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|m| m.with_input_fact(0, f32::fact([1, side, side, 3]).into()))
            .and_then(|m| m.into_optimized())
            .and_then(|m| m.into_runnable())
            .map_err(|e| PestError::ModelLoad(format!("{}: {e:#}", path.display())))?;

        info!(path = %path.display(), input_size = size, "model loaded");
        Ok(Self { plan, size })
    }
}

impl PestModel for OnnxPestModel {
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>, PestError> {
        if input.size != self.size {
            return Err(PestError::Inference(format!(
                "input is {0}x{0}, model expects {1}x{1}",
                input.size, self.size
            )));
        }

        let tensor = Tensor::from_shape(&input.shape(), &input.data)
            .map_err(|e| PestError::Inference(format!("{e:#}")))?;
        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| PestError::Inference(format!("{e:#}")))?;
        let first = outputs
            .first()
            .ok_or_else(|| PestError::Inference("model produced no outputs".into()))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| PestError::Inference(format!("{e:#}")))?;

        Ok(view.iter().copied().collect())
    }
}
