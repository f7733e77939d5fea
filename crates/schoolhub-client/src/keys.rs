//! Cache key builders.
//!
//! Keys are `<entity>:<kind>:<part>` so a whole entity can be dropped with
//! [`ClientCache::invalidate_prefix`](crate::ClientCache::invalidate_prefix).

use serde::Serialize;
use sha2::{Digest, Sha256};

pub mod students {
    pub const PREFIX: &str = "students:";

    pub fn list(filters_hash: &str) -> String {
        format!("{PREFIX}list:{filters_hash}")
    }

    pub fn by_id(id: &uuid::Uuid) -> String {
        format!("{PREFIX}id:{id}")
    }

    pub fn by_student_id(student_id: &str) -> String {
        format!("{PREFIX}student-id:{student_id}")
    }
}

pub mod registrations {
    pub const PREFIX: &str = "registrations:";

    pub fn list(filters_hash: &str) -> String {
        format!("{PREFIX}list:{filters_hash}")
    }

    pub fn by_id(id: &str) -> String {
        format!("{PREFIX}id:{id}")
    }
}

pub mod session {
    pub const USER: &str = "session:user";
}

/// Short stable hash of a filter object.
///
/// The filter is hashed through its JSON form, so two filters that
/// serialize the same share a cache entry.
pub fn hash_filters<T: Serialize>(filters: &T) -> String {
    let bytes = serde_json::to_vec(filters).unwrap_or_default();
    let digest = Sha256::digest(&bytes);
    hex::encode(&digest[..8])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hash_filters_consistency() {
        let filters = json!({"search": "ສົມ", "limit": 100});
        assert_eq!(hash_filters(&filters), hash_filters(&filters));
        assert_eq!(hash_filters(&filters).len(), 16);
    }

    #[test]
    fn test_hash_filters_differs_by_value() {
        assert_ne!(
            hash_filters(&json!({"search": "a"})),
            hash_filters(&json!({"search": "b"}))
        );
    }

    #[test]
    fn test_keys_share_entity_prefix() {
        assert!(students::list("abc").starts_with(students::PREFIX));
        assert!(students::by_student_id("001").starts_with(students::PREFIX));
        assert_eq!(registrations::by_id("INV-001"), "registrations:id:INV-001");
    }
}
