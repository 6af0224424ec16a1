//! Tag domain entity.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Canonical event category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: i32,
    #[schema(example = "Music")]
    pub name: String,
}
