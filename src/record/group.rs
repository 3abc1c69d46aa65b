//! Group record

use serde::{Deserialize, Deserializer, Serialize};

use super::{new_id, Record};

/// A named group of developers
///
/// `members` holds developer ids in display order. They are not checked
/// against the developer bucket; a dangling id is stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub members: Vec<String>,
}

impl Group {
    /// Create an empty group with a freshly generated id
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            members: Vec::new(),
        }
    }
}

impl Record for Group {
    const BUCKET: &'static str = "groups";
    const KIND: &'static str = "group";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Older writers stored an empty member list as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
