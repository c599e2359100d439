use ethers_core::types::Address;
use indexmap::IndexSet;

use crate::Error;

/// Ordered set of the tokens tracked by an index. Tokens keep the position at which
/// they were added, which is the position of their price in every price query.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    assets: IndexSet<Address>,
}

impl AssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `asset` to the registry.
    /// Errors
    ///  - [`Error::DuplicateAsset`] if the asset is already registered, in which case
    ///    the registry is left untouched
    pub fn add(&mut self, asset: Address) -> Result<(), Error> {
        if !self.assets.insert(asset) {
            return Err(Error::DuplicateAsset(asset));
        }

        Ok(())
    }

    /// Returns a snapshot of the registered assets in insertion order
    pub fn list(&self) -> Vec<Address> {
        self.assets.iter().cloned().collect()
    }

    pub fn contains(&self, asset: &Address) -> bool {
        self.assets.contains(asset)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use ethers_core::types::Address;

    use crate::registry::AssetRegistry;
    use crate::Error;

    #[test]
    fn new_registry_is_empty() {
        let registry = AssetRegistry::new();

        assert!(registry.is_empty());
        assert!(registry.list().is_empty());
    }

    #[test]
    fn list_keeps_insertion_order() {
        // Given
        let assets: Vec<Address> = [9u64, 3, 7, 1].into_iter().map(Address::from_low_u64_be).collect();
        let mut registry = AssetRegistry::new();

        // When
        for asset in &assets {
            registry.add(*asset).unwrap();
        }

        // Then
        assert_eq!(registry.list(), assets);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn duplicate_is_rejected_and_registry_unchanged() {
        // Given
        let mut registry = AssetRegistry::new();
        registry.add(Address::from_low_u64_be(1)).unwrap();
        registry.add(Address::from_low_u64_be(2)).unwrap();

        // When
        let result = registry.add(Address::from_low_u64_be(1));

        // Then
        assert!(matches!(result, Err(Error::DuplicateAsset(x)) if x == Address::from_low_u64_be(1)));
        assert_eq!(registry.list(), vec![Address::from_low_u64_be(1), Address::from_low_u64_be(2)]);
    }

    #[test]
    fn list_is_a_snapshot() {
        let mut registry = AssetRegistry::new();
        registry.add(Address::from_low_u64_be(1)).unwrap();

        let mut snapshot = registry.list();
        snapshot.push(Address::from_low_u64_be(2));

        assert_eq!(registry.len(), 1);
        assert!(!registry.contains(&Address::from_low_u64_be(2)));
    }
}
