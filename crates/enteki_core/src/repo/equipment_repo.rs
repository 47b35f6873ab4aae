//! Append-only equipment registry.
//!
//! # Invariants
//! - Items are never removed or reordered, so an `EquipmentRef` handed out
//!   by `register` keeps naming the same item for the process lifetime.
//! - Duplicate names are allowed; only blank input is rejected.

use crate::model::equipment::{EquipmentItem, EquipmentRef, EquipmentValidationError};

/// Ordered list of registered equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentRegistry {
    items: Vec<EquipmentItem>,
}

impl EquipmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps items loaded from storage, preserving their order.
    pub fn from_items(items: Vec<EquipmentItem>) -> Self {
        Self { items }
    }

    /// Validates form input and appends the item.
    ///
    /// Returns the new item's position.
    pub fn register(
        &mut self,
        name: &str,
        kind: &str,
    ) -> Result<EquipmentRef, EquipmentValidationError> {
        let item = EquipmentItem::from_input(name, kind)?;
        self.items.push(item);
        Ok(self.items.len() - 1)
    }

    /// Drops items registered after the first `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    pub fn get(&self, equipment: EquipmentRef) -> Option<&EquipmentItem> {
        self.items.get(equipment)
    }

    pub fn items(&self) -> &[EquipmentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::EquipmentRegistry;
    use crate::model::equipment::{EquipmentType, EquipmentValidationError};

    #[test]
    fn register_appends_in_order_and_allows_duplicates() {
        let mut registry = EquipmentRegistry::new();
        assert_eq!(registry.register("弓A", "bow").unwrap(), 0);
        assert_eq!(registry.register("弓A", "bow").unwrap(), 1);
        assert_eq!(registry.register("矢セット", "arrow").unwrap(), 2);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.get(2).unwrap().kind, EquipmentType::Arrow);
    }

    #[test]
    fn rejected_input_does_not_change_registry() {
        let mut registry = EquipmentRegistry::new();
        let err = registry.register(" ", "bow").unwrap_err();
        assert_eq!(err, EquipmentValidationError::EmptyName);
        assert!(registry.is_empty());
    }
}
