//! Identity contract for entities stored through the generic repository.

use uuid::Uuid;

/// Identifier type of an entity.
///
/// Keys render to the string under which the document is stored, and can
/// tell whether they hold the "absent" value. An entity whose key is absent
/// is treated as missing and refused by `create` and `update`.
pub trait EntityKey: Clone + Eq + std::fmt::Debug + std::fmt::Display + Send + Sync + 'static {
    /// Stable storage key.
    fn storage_key(&self) -> String;

    /// Whether this is the absent value (nil UUID, empty string).
    fn is_absent(&self) -> bool;
}

impl EntityKey for Uuid {
    fn storage_key(&self) -> String {
        self.hyphenated().to_string()
    }

    fn is_absent(&self) -> bool {
        self.is_nil()
    }
}

impl EntityKey for String {
    fn storage_key(&self) -> String {
        self.clone()
    }

    fn is_absent(&self) -> bool {
        self.is_empty()
    }
}

/// A record with a single immutable identifier.
pub trait Entity: Clone + Send + Sync + 'static {
    type Key: EntityKey;

    fn id(&self) -> &Self::Key;

    /// Whether the entity counts as absent.
    fn is_absent(&self) -> bool {
        self.id().is_absent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_keys() {
        assert!(Uuid::nil().is_absent());
        let id = Uuid::new_v4();
        assert!(!id.is_absent());
        assert_eq!(id.storage_key(), id.to_string());
    }

    #[test]
    fn string_keys() {
        assert!(String::new().is_absent());
        assert!(!"sword".to_string().is_absent());
        assert_eq!("sword".to_string().storage_key(), "sword");
    }
}
