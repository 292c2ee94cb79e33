// Tag read results

use std::fmt;

use serde::Serialize;

use crate::field_mapping::StandardField;

/// Which tag the fields were read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TagKind {
    #[default]
    None,
    V1,
    V2 { major: u8, minor: u8 },
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::None => write!(f, "none"),
            TagKind::V1 => write!(f, "ID3v1"),
            TagKind::V2 { major, minor } => write!(f, "ID3v2.{}.{}", major, minor),
        }
    }
}

/// Fields extracted from one tag. Empty values are stored as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagResult {
    pub kind: TagKind,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub track: Option<String>,
    pub year: Option<String>,
}

impl TagResult {
    pub fn with_kind(kind: TagKind) -> Self {
        TagResult {
            kind,
            ..Default::default()
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn track(&self) -> Option<&str> {
        self.track.as_deref()
    }

    pub fn year(&self) -> Option<&str> {
        self.year.as_deref()
    }

    pub fn get(&self, field: StandardField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Store a value, replacing any earlier one. An empty value clears the field.
    pub fn set(&mut self, field: StandardField, value: String) {
        let slot = self.slot_mut(field);
        *slot = if value.is_empty() { None } else { Some(value) };
    }

    /// True when no field holds a value.
    pub fn is_empty(&self) -> bool {
        StandardField::ALL.iter().all(|&f| self.get(f).is_none())
    }

    fn slot(&self, field: StandardField) -> &Option<String> {
        match field {
            StandardField::Title => &self.title,
            StandardField::Artist => &self.artist,
            StandardField::Album => &self.album,
            StandardField::Genre => &self.genre,
            StandardField::Track => &self.track,
            StandardField::Year => &self.year,
        }
    }

    fn slot_mut(&mut self, field: StandardField) -> &mut Option<String> {
        match field {
            StandardField::Title => &mut self.title,
            StandardField::Artist => &mut self.artist,
            StandardField::Album => &mut self.album,
            StandardField::Genre => &mut self.genre,
            StandardField::Track => &mut self.track,
            StandardField::Year => &mut self.year,
        }
    }
}

impl fmt::Display for TagResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TagResult(kind={}, title={}, artist={}, album={})",
            self.kind,
            self.title().unwrap_or("None"),
            self.artist().unwrap_or("None"),
            self.album().unwrap_or("None")
        )
    }
}
