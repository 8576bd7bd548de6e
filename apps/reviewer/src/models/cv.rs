use serde::{Deserialize, Serialize};

/// One candidate document inside a source, as listed by the review service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CvDescriptor {
    pub name: String,
    pub path: String,
    pub source: String,
}
