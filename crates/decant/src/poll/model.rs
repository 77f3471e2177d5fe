//! Raw question model as returned by the survey platform.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DecantError, Result};

/// Localized text keyed by language code (e.g. "de", "en").
///
/// The platform ships all user-facing text this way. Only the German
/// entry is used for classification and naming.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Localized(IndexMap<String, String>);

impl Localized {
    /// Create localized text with a single German entry.
    pub fn german_only(text: impl Into<String>) -> Self {
        let mut map = IndexMap::new();
        map.insert("de".to_string(), text.into());
        Self(map)
    }

    /// The German text, treating a missing key and an empty string alike.
    pub fn german(&self) -> Option<&str> {
        self.0
            .get("de")
            .map(|s| s.as_str())
            .filter(|s| !s.is_empty())
    }

    /// True if there is no usable German entry.
    pub fn is_blank(&self) -> bool {
        self.german().is_none()
    }
}

/// Question type tag assigned by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeTag {
    Input,
    Choice,
    Matrix,
    Scale,
}

impl TypeTag {
    /// The platform's wire spelling of this tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Input => "INPUT",
            TypeTag::Choice => "CHOICE",
            TypeTag::Matrix => "MATRIX",
            TypeTag::Scale => "SCALE",
        }
    }
}

/// Input widget kind for free-text groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InputKind {
    Singleline,
    Multiline,
    Integer,
}

impl InputKind {
    /// Lowercase code used in derived category names.
    pub fn code(&self) -> &'static str {
        match self {
            InputKind::Singleline => "singleline",
            InputKind::Multiline => "multiline",
            InputKind::Integer => "integer",
        }
    }

    /// Parse the lowercase code back into a kind.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "singleline" => Some(InputKind::Singleline),
            "multiline" => Some(InputKind::Multiline),
            "integer" => Some(InputKind::Integer),
            _ => None,
        }
    }
}

/// Sub-element of a group: a matrix row or an input placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Platform item identifier (a string on the wire).
    pub id: String,
    /// Localized item name.
    #[serde(default)]
    pub name: Localized,
}

/// One group of variables within a question.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Platform group identifier.
    pub id: i64,
    /// Localized group name.
    #[serde(default)]
    pub name: Localized,
    /// Platform variable names, e.g. `["V12", "V13"]`.
    #[serde(default)]
    pub varnames: Vec<String>,
    /// Localized choice/scale labels, parallel to `codes`.
    #[serde(default)]
    pub labels: Vec<Localized>,
    /// Answer codes, parallel to `labels`. May be empty or blank.
    #[serde(default)]
    pub codes: Vec<String>,
    /// Items (matrix rows, input placeholders).
    #[serde(default)]
    pub items: Vec<Item>,
    /// Input widget kind for free-text groups.
    #[serde(default)]
    pub input_type: Option<InputKind>,
    /// Numeric range `[min, max]` or `[min, max, step]`.
    #[serde(default)]
    pub range: Option<Vec<f64>>,
}

impl Group {
    /// First entry of the range, if any.
    pub fn range_min(&self) -> Option<f64> {
        self.range.as_ref().and_then(|r| r.first().copied())
    }

    /// Second entry of the range, if any.
    pub fn range_max(&self) -> Option<f64> {
        self.range.as_ref().and_then(|r| r.get(1).copied())
    }
}

/// One survey question with its groups, as fetched from the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Platform question identifier, unique within the poll.
    pub id: i64,
    /// Owning poll identifier.
    #[serde(default)]
    pub poll_id: i64,
    /// Question type tag.
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    /// Localized question text. The German entry is required.
    pub question: Localized,
    /// Position of the question within its page.
    #[serde(default)]
    pub position: i64,
    /// Page (section) identifier.
    pub page_id: i64,
    /// Variable groups.
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl Question {
    /// The German question text.
    ///
    /// Surveys without German text are not supported; a missing or empty
    /// entry is a malformed question.
    pub fn text(&self) -> Result<&str> {
        self.question
            .german()
            .ok_or_else(|| DecantError::MalformedQuestion {
                question_id: self.id,
                message: "question has no German text".to_string(),
            })
    }
}
