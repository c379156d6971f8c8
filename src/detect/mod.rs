mod backend;
mod backends;
mod classes;
mod result;

pub use backend::DetectorBackend;
pub use backends::{create_backend, StubBackend};
pub use classes::{class_label, COCO_CLASSES};
pub use result::{BoundingBox, Detection};

#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
