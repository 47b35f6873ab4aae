//! Equipment item model.
//!
//! # Responsibility
//! - Define registered equipment (`name` + `type`) and its validation.
//!
//! # Invariants
//! - `name` is never blank; it is stored trimmed.
//! - Equipment is referenced by its position in the registry
//!   (`EquipmentRef`), which is only stable because items are never removed.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Positional index into the equipment registry.
pub type EquipmentRef = usize;

/// Equipment category.
///
/// Serialized in English; the Japanese labels of legacy documents are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentType {
    #[serde(rename = "bow", alias = "弓")]
    Bow,
    #[serde(rename = "glove", alias = "かけ")]
    Glove,
    #[serde(rename = "string", alias = "弦")]
    Bowstring,
    #[serde(rename = "arrow", alias = "矢")]
    Arrow,
}

impl EquipmentType {
    pub const ALL: [Self; 4] = [Self::Bow, Self::Glove, Self::Bowstring, Self::Arrow];

    /// Parses user-facing type text (English, case-insensitive, or Japanese).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "bow" | "弓" => Some(Self::Bow),
            "glove" | "かけ" => Some(Self::Glove),
            "string" | "弦" => Some(Self::Bowstring),
            "arrow" | "矢" => Some(Self::Arrow),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bow => "bow",
            Self::Glove => "glove",
            Self::Bowstring => "string",
            Self::Arrow => "arrow",
        }
    }
}

impl Display for EquipmentType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registration input failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentValidationError {
    EmptyName,
    EmptyType,
    UnknownType(String),
}

impl Display for EquipmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "equipment name cannot be blank"),
            Self::EmptyType => write!(f, "equipment type cannot be blank"),
            Self::UnknownType(value) => write!(
                f,
                "unknown equipment type `{value}`; expected bow|glove|string|arrow"
            ),
        }
    }
}

impl Error for EquipmentValidationError {}

/// One registered piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentItem {
    pub name: String,
    /// Serialized as `type` to match the stored document.
    #[serde(rename = "type")]
    pub kind: EquipmentType,
}

impl EquipmentItem {
    /// Validates raw form input into an item.
    ///
    /// # Errors
    /// - `EmptyName` / `EmptyType` when either field is blank after trimming.
    /// - `UnknownType` when `kind` is not a recognised category.
    pub fn from_input(name: &str, kind: &str) -> Result<Self, EquipmentValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EquipmentValidationError::EmptyName);
        }
        let kind_text = kind.trim();
        if kind_text.is_empty() {
            return Err(EquipmentValidationError::EmptyType);
        }
        let kind = EquipmentType::parse(kind_text)
            .ok_or_else(|| EquipmentValidationError::UnknownType(kind_text.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{EquipmentItem, EquipmentType, EquipmentValidationError};

    #[test]
    fn from_input_trims_and_parses() {
        let item = EquipmentItem::from_input("  弓A ", "Bow").unwrap();
        assert_eq!(item.name, "弓A");
        assert_eq!(item.kind, EquipmentType::Bow);

        let item = EquipmentItem::from_input("kake", "かけ").unwrap();
        assert_eq!(item.kind, EquipmentType::Glove);
    }

    #[test]
    fn from_input_rejects_blank_and_unknown() {
        assert_eq!(
            EquipmentItem::from_input("   ", "bow").unwrap_err(),
            EquipmentValidationError::EmptyName
        );
        assert_eq!(
            EquipmentItem::from_input("bow A", " ").unwrap_err(),
            EquipmentValidationError::EmptyType
        );
        assert_eq!(
            EquipmentItem::from_input("bow A", "quiver").unwrap_err(),
            EquipmentValidationError::UnknownType("quiver".to_string())
        );
    }

    #[test]
    fn wire_shape_uses_type_field_and_accepts_japanese_labels() {
        let item = EquipmentItem::from_input("弦1", "string").unwrap();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "弦1", "type": "string" }));

        let decoded: EquipmentItem =
            serde_json::from_value(serde_json::json!({ "name": "矢", "type": "矢" })).unwrap();
        assert_eq!(decoded.kind, EquipmentType::Arrow);
    }
}
