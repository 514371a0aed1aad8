//! Source languages and diagram kinds.

use std::fmt;

use serde::Serialize;

/// Language the submitted code is written in.
///
/// Serialized with its lowercase wire name (`"python"`, `"java"`, `"c"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    #[default]
    Python,
    Java,
    C,
}

impl SourceLanguage {
    /// All supported languages, in selector order.
    pub const ALL: [Self; 3] = [Self::Python, Self::Java, Self::C];

    /// Parse a language name, ignoring ASCII case.
    ///
    /// Returns None if the language is not supported.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Some(Self::Python),
            "java" => Some(Self::Java),
            "c" => Some(Self::C),
            _ => None,
        }
    }

    /// Wire name sent to the generation backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::C => "c",
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagram variant selected from the backend's multi-variant response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiagramKind {
    #[default]
    Flowchart,
    Sequence,
    StateMachine,
    Class,
}

impl DiagramKind {
    /// All diagram kinds, in selector order.
    pub const ALL: [Self; 4] = [
        Self::Flowchart,
        Self::Sequence,
        Self::StateMachine,
        Self::Class,
    ];

    /// Parse a diagram kind from its identifier.
    ///
    /// Returns None if the kind is not recognized.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "flowchart" => Some(Self::Flowchart),
            "sequence" => Some(Self::Sequence),
            "statemachine" => Some(Self::StateMachine),
            "class" => Some(Self::Class),
            _ => None,
        }
    }

    /// Identifier of this kind, which is also its response field name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flowchart => "flowchart",
            Self::Sequence => "sequence",
            Self::StateMachine => "statemachine",
            Self::Class => "class",
        }
    }

    /// Human-readable label for selectors and messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Flowchart => "Flowchart",
            Self::Sequence => "Sequence Diagram",
            Self::StateMachine => "State Machine",
            Self::Class => "UML Class",
        }
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
