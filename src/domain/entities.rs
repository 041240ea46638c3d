//! Domain entities: core data structures

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::error::DomainError;

/// Fixed rank of a unit in the `union → village → ward → booth` chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Level {
    Union,
    Village,
    Ward,
    Booth,
}

impl Level {
    /// All levels, top-down.
    pub const ALL: [Level; 4] = [Level::Union, Level::Village, Level::Ward, Level::Booth];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Union => "union",
            Level::Village => "village",
            Level::Ward => "ward",
            Level::Booth => "booth",
        }
    }

    /// Parse a level name, ignoring surrounding whitespace and case.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(Level::Union),
            "village" => Ok(Level::Village),
            "ward" => Ok(Level::Ward),
            "booth" => Ok(Level::Booth),
            _ => Err(DomainError::InvalidLevel(raw.to_string())),
        }
    }

    /// Level directly above this one, `None` for union.
    pub fn parent_level(&self) -> Option<Level> {
        match self {
            Level::Union => None,
            Level::Village => Some(Level::Union),
            Level::Ward => Some(Level::Village),
            Level::Booth => Some(Level::Ward),
        }
    }

    /// Level directly below this one, `None` for booth.
    pub fn child_level(&self) -> Option<Level> {
        match self {
            Level::Union => Some(Level::Village),
            Level::Village => Some(Level::Ward),
            Level::Ward => Some(Level::Booth),
            Level::Booth => None,
        }
    }

    pub fn requires_parent(&self) -> bool {
        self.parent_level().is_some()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::parse(s)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Stored records may carry inconsistent casing ("Village", "WARD").
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Level::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Opaque unit identifier, assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for UnitId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Persisted unit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: UnitId,
    pub name_label: String,
    pub level: Level,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<UnitId>,
    #[serde(default)]
    pub person_name: String,
    #[serde(default)]
    pub role_label: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub photo: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    /// Materialize a validated unit under a store-assigned id.
    pub fn from_valid(id: UnitId, valid: ValidUnit, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name_label: valid.name_label,
            level: valid.level,
            parent_id: valid.parent_id,
            person_name: valid.person_name,
            role_label: valid.role_label,
            phone: valid.phone,
            photo: valid.photo,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the fields present in `patch`. Level and parent are never touched.
    ///
    /// Returns `true` if any field changed.
    pub fn apply(&mut self, patch: &UnitPatch) -> bool {
        let mut changed = false;
        let fields = [
            (&mut self.name_label, &patch.name_label),
            (&mut self.person_name, &patch.person_name),
            (&mut self.role_label, &patch.role_label),
            (&mut self.phone, &patch.phone),
            (&mut self.photo, &patch.photo),
        ];
        for (current, update) in fields {
            if let Some(value) = update {
                if *current != *value {
                    *current = value.clone();
                    changed = true;
                }
            }
        }
        changed
    }
}

/// A missing, null or empty parent reference all mean "no parent".
fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<UnitId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(UnitId))
}

/// Raw create request, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitDraft {
    pub level: String,
    pub name_label: String,
    pub parent_id: Option<String>,
    pub person_name: Option<String>,
    pub role_label: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

impl UnitDraft {
    pub fn new(level: impl Into<String>, name_label: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            name_label: name_label.into(),
            ..Self::default()
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_person(mut self, person_name: impl Into<String>) -> Self {
        self.person_name = Some(person_name.into());
        self
    }

    pub fn with_role(mut self, role_label: impl Into<String>) -> Self {
        self.role_label = Some(role_label.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }
}

/// Create request after validation and normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUnit {
    pub level: Level,
    pub name_label: String,
    pub parent_id: Option<UnitId>,
    pub person_name: String,
    pub role_label: String,
    pub phone: String,
    pub photo: String,
}

/// Partial update of the descriptive fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitPatch {
    pub name_label: Option<String>,
    pub person_name: Option<String>,
    pub role_label: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

impl UnitPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name_label: impl Into<String>) -> Self {
        self.name_label = Some(name_label.into());
        self
    }

    pub fn with_person(mut self, person_name: impl Into<String>) -> Self {
        self.person_name = Some(person_name.into());
        self
    }

    pub fn with_role(mut self, role_label: impl Into<String>) -> Self {
        self.role_label = Some(role_label.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_photo(mut self, photo: impl Into<String>) -> Self {
        self.photo = Some(photo.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name_label.is_none()
            && self.person_name.is_none()
            && self.role_label.is_none()
            && self.phone.is_none()
            && self.photo.is_none()
    }
}

/// Normalized unit as handed out to readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitNode {
    pub id: String,
    pub name_label: String,
    pub level: Level,
    pub parent_id: Option<String>,
    pub person_name: String,
    pub role_label: String,
    pub phone: String,
    pub photo: String,
}

impl From<&Unit> for UnitNode {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id.to_string(),
            name_label: unit.name_label.clone(),
            level: unit.level,
            parent_id: unit.parent_id.as_ref().map(UnitId::to_string),
            person_name: unit.person_name.clone(),
            role_label: unit.role_label.clone(),
            phone: unit.phone.clone(),
            photo: unit.photo.clone(),
        }
    }
}

impl From<Unit> for UnitNode {
    fn from(unit: Unit) -> Self {
        Self::from(&unit)
    }
}

impl fmt::Display for UnitNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name_label, self.level)?;
        if !self.person_name.is_empty() {
            write!(f, " {}", self.person_name)?;
            if !self.role_label.is_empty() {
                write!(f, " ({})", self.role_label)?;
            }
        }
        Ok(())
    }
}
