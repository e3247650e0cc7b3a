use serde::{Deserialize, Serialize};

/// Which side of a translation an artifact holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Original,
    Translated,
}

impl ArtifactKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Original => "original",
            Self::Translated => "translated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub content: String,
    pub kind: ArtifactKind,
    /// Name of the original this artifact was translated from. A plain
    /// reference: the original may since have been deleted or replaced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derived_from: Option<String>,
}

impl Artifact {
    pub fn original(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: ArtifactKind::Original,
            derived_from: None,
        }
    }

    pub fn translated(
        name: impl Into<String>,
        content: impl Into<String>,
        derived_from: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            kind: ArtifactKind::Translated,
            derived_from,
        }
    }
}
