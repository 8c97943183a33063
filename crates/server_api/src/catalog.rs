use std::{collections::HashSet, fs, path::Path};

use serde::{Deserialize, Serialize};
use shared::domain::{Category, Conference, Speaker, SpeakerId, Talk, TalkId};
use thiserror::Error;

const DEMO_CATALOG: &str = include_str!("../catalog/demo.toml");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate talk id {0}")]
    DuplicateTalk(i64),
    #[error("duplicate speaker id {0}")]
    DuplicateSpeaker(i64),
    #[error("talk {talk_id} references unknown speaker {speaker_id}")]
    UnknownSpeaker { talk_id: i64, speaker_id: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerRecord {
    pub id: SpeakerId,
    pub first_name: String,
    pub last_name: String,
    pub linkedin: String,
}

impl SpeakerRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn to_speaker(&self) -> Speaker {
        Speaker {
            id: Some(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            linkedin: self.linkedin.clone(),
        }
    }
}

/// A talk as stored: speakers are referenced by id and joined on output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TalkRecord {
    pub id: TalkId,
    pub title: String,
    #[serde(default)]
    pub speaker_ids: Vec<SpeakerId>,
    #[serde(default)]
    pub category: Option<Category>,
    pub description: String,
    pub time: String,
    #[serde(default)]
    pub is_break: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub conference: Conference,
    #[serde(default)]
    pub speakers: Vec<SpeakerRecord>,
    #[serde(default)]
    pub talks: Vec<TalkRecord>,
}

impl Catalog {
    /// The built-in Google Cloud Tech Summit schedule.
    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_toml_str(DEMO_CATALOG)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(raw)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn speaker(&self, id: SpeakerId) -> Option<&SpeakerRecord> {
        self.speakers.iter().find(|speaker| speaker.id == id)
    }

    /// Joins speaker ids into full speaker records, skipping unknown ids.
    pub fn expand(&self, talk: &TalkRecord) -> Talk {
        Talk {
            id: talk.id,
            time: talk.time.clone(),
            title: talk.title.clone(),
            description: talk.description.clone(),
            category: talk.category.clone(),
            speakers: talk
                .speaker_ids
                .iter()
                .filter_map(|id| self.speaker(*id))
                .map(SpeakerRecord::to_speaker)
                .collect(),
            is_break: Some(talk.is_break),
        }
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let mut speaker_ids = HashSet::new();
        for speaker in &self.speakers {
            if !speaker_ids.insert(speaker.id) {
                return Err(CatalogError::DuplicateSpeaker(speaker.id.0));
            }
        }

        let mut talk_ids = HashSet::new();
        for talk in &self.talks {
            if !talk_ids.insert(talk.id) {
                return Err(CatalogError::DuplicateTalk(talk.id.0));
            }
            if let Some(missing) = talk
                .speaker_ids
                .iter()
                .find(|id| !speaker_ids.contains(*id))
            {
                return Err(CatalogError::UnknownSpeaker {
                    talk_id: talk.id.0,
                    speaker_id: missing.0,
                });
            }
        }
        Ok(())
    }
}
