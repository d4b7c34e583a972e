use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::application::ports::{ClassifierError, ClassifierLoader, EmotionClassifier};

/// Loads the classifier on first use and shares it afterwards.
///
/// Concurrent first callers wait on the same initialization, so the loader
/// runs at most once per successful load. A failed load leaves the cell empty
/// and the next caller tries again.
pub struct LazyEmotionClassifier {
    loader: Arc<dyn ClassifierLoader>,
    cell: OnceCell<Arc<dyn EmotionClassifier>>,
}

impl LazyEmotionClassifier {
    pub fn new(loader: Arc<dyn ClassifierLoader>) -> Self {
        Self {
            loader,
            cell: OnceCell::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.initialized()
    }

    pub async fn get(&self) -> Result<Arc<dyn EmotionClassifier>, ClassifierError> {
        let classifier = self
            .cell
            .get_or_try_init(|| async {
                let loader = Arc::clone(&self.loader);
                tracing::info!("Loading emotion classifier");
                let classifier = tokio::task::spawn_blocking(move || loader.load())
                    .await
                    .map_err(|e| {
                        ClassifierError::ModelLoadFailed(format!("task join error: {e}"))
                    })??;
                tracing::info!("Emotion classifier ready");
                Ok::<_, ClassifierError>(classifier)
            })
            .await?;

        Ok(Arc::clone(classifier))
    }
}
