use serde::Serialize;

/// Acknowledgment returned after a save.
#[derive(Debug, Serialize)]
pub struct SavedResponse {
    pub success: bool,
    pub message: String,
}

impl SavedResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: "Resume Saved Successfully".to_string(),
        }
    }
}
