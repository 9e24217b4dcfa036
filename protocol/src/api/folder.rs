//! Folder API DTOs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Create a folder, `POST /folders`
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    /// Hex color used by the dashboard, e.g. `#6366f1`
    #[validate(length(min = 4, max = 9))]
    pub color: String,
}
