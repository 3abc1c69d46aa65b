//! Developer record

use serde::{Deserialize, Serialize};

use super::{new_id, Record};

/// A developer who can be placed into groups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Developer {
    pub id: String,
    pub name: String,
}

impl Developer {
    /// Create a developer with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }
}

impl Record for Developer {
    const BUCKET: &'static str = "developers";
    const KIND: &'static str = "developer";

    fn id(&self) -> &str {
        &self.id
    }
}
