//! Series and episode types.
//!
//! These mirror the JSON shape exchanged with the generation service, so
//! field names are camelCase on the wire. Every field is required: a missing
//! field is a deserialisation error, never a default.

use serde::{Deserialize, Serialize};

/// One narrative unit within a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Episode title
    pub title: String,

    /// Opening hook that grabs the viewer
    pub hook: String,

    /// Short description of the story told
    pub narrative: String,

    /// The scene the episode is built around
    pub key_scene: String,

    /// What the story teaches about money today
    pub modern_lesson: String,
}

impl Episode {
    /// Create a new episode
    pub fn new(
        title: impl Into<String>,
        hook: impl Into<String>,
        narrative: impl Into<String>,
        key_scene: impl Into<String>,
        modern_lesson: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            hook: hook.into(),
            narrative: narrative.into(),
            key_scene: key_scene.into(),
            modern_lesson: modern_lesson.into(),
        }
    }
}

/// A themed collection of episodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    /// Series title
    pub title: String,

    /// One-paragraph pitch
    pub description: String,

    /// Episodes in broadcast order
    pub episodes: Vec<Episode>,
}

impl Series {
    /// Create a series with no episodes
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            episodes: Vec::new(),
        }
    }

    /// Append an episode
    pub fn with_episode(mut self, episode: Episode) -> Self {
        self.episodes.push(episode);
        self
    }

    /// Append several episodes
    pub fn with_episodes(mut self, episodes: impl IntoIterator<Item = Episode>) -> Self {
        self.episodes.extend(episodes);
        self
    }

    /// Parse a series from its JSON representation
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Wire-level payload returned by a generation call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    /// Newly generated series, in the order the model returned them
    pub new_series: Vec<Series>,
}

impl GenerationResult {
    /// Number of series in the result
    pub fn len(&self) -> usize {
        self.new_series.len()
    }

    /// Whether the result holds no series
    pub fn is_empty(&self) -> bool {
        self.new_series.is_empty()
    }
}
