use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::info;

use crate::config::{ModelConfig, ModelOutput};
use crate::error::PestError;
use crate::inference::artifact;
use crate::inference::model::{OnnxPestModel, PestModel};
use crate::inference::prediction::Prediction;
use crate::inference::preprocess::{self, InputScaling};

/// Lazily loaded classifier, memoized for the life of the process.
///
/// The first caller resolves the artifact (downloading it if needed) and
/// deserializes the network; everyone else waits on the same cell. A failed
/// load leaves the cell empty so the next request tries again.
#[derive(Clone)]
pub struct ModelCache {
    cell: Arc<OnceCell<Arc<dyn PestModel>>>,
    settings: Arc<ModelConfig>,
}

impl ModelCache {
    pub fn new(settings: ModelConfig) -> Self {
        Self {
            cell: Arc::new(OnceCell::new()),
            settings: Arc::new(settings),
        }
    }

    pub fn preloaded(model: Arc<dyn PestModel>, settings: ModelConfig) -> Self {
        Self {
            cell: Arc::new(OnceCell::new_with(Some(model))),
            settings: Arc::new(settings),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub fn settings(&self) -> &ModelConfig {
        &self.settings
    }

    pub async fn get(&self) -> Result<Arc<dyn PestModel>, PestError> {
        let model = self
            .cell
            .get_or_try_init(|| load(self.settings.clone()))
            .await?;
        Ok(model.clone())
    }

    /// Validate, decode, preprocess and run one uploaded image.
    pub async fn classify(&self, filename: &str, bytes: Vec<u8>) -> Result<Prediction, PestError> {
        preprocess::validate_extension(filename)?;
        let model = self.get().await?;
        let size = self.settings.input_size;
        let scaling: InputScaling = self.settings.input_scaling;
        let output = self.settings.output;

        let started = Instant::now();
        let scores = tokio::task::spawn_blocking(move || {
            let image = preprocess::decode(&bytes)?;
            let input = preprocess::to_input(&image, size, scaling);
            model.predict(&input)
        })
        .await??;

        let prediction = match output {
            ModelOutput::Probabilities => Prediction::from_probabilities(scores)?,
            ModelOutput::Logits => Prediction::from_logits(scores)?,
        };
        info!(
            file = %filename,
            class = %prediction.class,
            confidence = prediction.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "prediction"
        );
        Ok(prediction)
    }
}

async fn load(settings: Arc<ModelConfig>) -> Result<Arc<dyn PestModel>, PestError> {
    let client = artifact::http_client(Duration::from_secs(settings.download_timeout_secs))?;
    let path = artifact::ensure_local(&settings.path, settings.download_url.as_ref(), &client)
        .await?;
    let size = settings.input_size;
    let model = tokio::task::spawn_blocking(move || OnnxPestModel::load(&path, size)).await??;
    Ok(Arc::new(model))
}
