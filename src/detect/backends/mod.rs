use anyhow::{anyhow, Result};

use crate::config::ModelSettings;
use crate::detect::backend::DetectorBackend;

pub mod stub;

#[cfg(feature = "backend-tract")]
pub mod tract;

pub use stub::StubBackend;

#[cfg(feature = "backend-tract")]
pub use tract::TractBackend;

/// Construct the detector backend named by the model settings.
pub fn create_backend(settings: &ModelSettings) -> Result<Box<dyn DetectorBackend>> {
    match settings.backend.as_str() {
        "stub" => Ok(Box::new(StubBackend::new())),
        "tract" => {
            #[cfg(feature = "backend-tract")]
            {
                let backend =
                    TractBackend::new(&settings.path, settings.input_width, settings.input_height)?
                        .with_threshold(settings.confidence_threshold)
                        .with_nms_iou(settings.nms_iou);
                Ok(Box::new(backend))
            }
            #[cfg(not(feature = "backend-tract"))]
            {
                Err(anyhow!(
                    "backend 'tract' requires the backend-tract feature"
                ))
            }
        }
        other => Err(anyhow!("unknown detector backend '{}'", other)),
    }
}
