use std::fmt;

use uuid::Uuid;

/// Identifies one uploaded clip for the lifetime of a prediction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadId(Uuid);

impl UploadId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// File name prefix for the transient artifact holding this upload.
    pub fn file_prefix(&self) -> String {
        format!("upload_{}", self.0.simple())
    }
}

impl Default for UploadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
