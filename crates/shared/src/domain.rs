use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(TalkId);
id_newtype!(SpeakerId);

/// Legacy marker for the lunch-break entry in catalogs that predate `is_break`.
pub const LUNCH_BREAK_TALK_ID: TalkId = TalkId(4);

/// Free-form category tag attached to a talk.
///
/// Older catalogs publish categories as JSON numbers, so both numbers and
/// strings are accepted on input; other JSON scalars are kept as their text.
/// Canonical integer tags are written back as numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn label(&self) -> String {
        format!("Category {}", self.0)
    }

    /// Styling tag used for the category badge, e.g. `category-1`.
    pub fn css_class(&self) -> String {
        let slug: String = self
            .0
            .trim()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        format!("category-{slug}")
    }

    /// Tag-level equality used by filters: surrounding whitespace is ignored.
    pub fn matches(&self, tag: &str) -> bool {
        self.0.trim() == tag.trim()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Category {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCategory {
    Integer(i64),
    Float(f64),
    Flag(bool),
    Text(String),
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawCategory::deserialize(deserializer)? {
            RawCategory::Integer(n) => Category::from(n),
            RawCategory::Float(n) => Category(n.to_string()),
            RawCategory::Flag(b) => Category(b.to_string()),
            RawCategory::Text(s) => Category(s),
        })
    }
}

impl Serialize for Category {
    /// Only tags that are the canonical spelling of an integer go out as
    /// numbers; `"007"` or `"+5"` stay strings.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.0.parse::<i64>() {
            Ok(n) if n.to_string() == self.0 => serializer.serialize_i64(n),
            _ => serializer.serialize_str(&self.0),
        }
    }
}

/// Header details for the event the schedule belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conference {
    pub name: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SpeakerId>,
    pub first_name: String,
    pub last_name: String,
    pub linkedin: String,
}

impl Speaker {
    /// First character of each name, as provided. Empty names contribute nothing.
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect()
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    pub id: TalkId,
    pub time: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub speakers: Vec<Speaker>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_break: Option<bool>,
}

impl Talk {
    /// Category tag, treating an empty tag as absent.
    pub fn category(&self) -> Option<&Category> {
        self.category.as_ref().filter(|c| !c.is_empty())
    }

    pub fn is_lunch_break(&self) -> bool {
        self.is_break.unwrap_or(self.id == LUNCH_BREAK_TALK_ID)
    }
}
