//! Artifact references and declarations
//!
//! Artifacts live in the tracking backend. Steps only exchange their names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Version tag resolved by the tracking backend at invocation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionTag {
    /// Most recently logged revision
    Latest,
    /// Revision promoted for production use
    Prod,
}

impl VersionTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Prod => "prod",
        }
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an upstream artifact: `name:tag`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArtifactRef {
    pub name: &'static str,
    pub tag: VersionTag,
}

impl ArtifactRef {
    pub const fn latest(name: &'static str) -> Self {
        Self {
            name,
            tag: VersionTag::Latest,
        }
    }

    pub const fn prod(name: &'static str) -> Self {
        Self {
            name,
            tag: VersionTag::Prod,
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}

impl Serialize for ArtifactRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Artifact a step declares it will log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArtifactSpec {
    /// Logical name, consumed downstream as `name:tag`
    pub name: &'static str,
    /// Type label (e.g. `raw_data`)
    pub artifact_type: &'static str,
    /// Human readable description
    pub description: &'static str,
}

impl ArtifactSpec {
    pub const fn new(
        name: &'static str,
        artifact_type: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name,
            artifact_type,
            description,
        }
    }
}
