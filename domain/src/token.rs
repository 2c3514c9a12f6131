use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A per-user paint credential: an unguessable 128-bit value paired with the
/// integer uid it authenticates. Only the hyphenated-hex string form ever
/// crosses the wire; the uid is carried alongside purely for the registry's
/// own bookkeeping (cooldown keys, ban checks, counting).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    value: Uuid,
    uid: u32,
}

impl Token {
    /// Mints a fresh, cryptographically unpredictable token for `uid`.
    #[must_use]
    pub fn generate(uid: u32) -> Self {
        Self {
            value: Uuid::new_v4(),
            uid,
        }
    }

    /// Reconstructs a token from its canonical string form, e.g. when loading
    /// a previously issued token back out of storage.
    #[must_use]
    pub fn from_parts(value: Uuid, uid: u32) -> Self {
        Self { value, uid }
    }

    #[must_use]
    pub fn uid(self) -> u32 {
        self.uid
    }

    #[must_use]
    pub fn value(self) -> Uuid {
        self.value
    }

    /// The canonical 8-4-4-4-12 hyphenated hex form presented to clients.
    #[must_use]
    pub fn to_canonical_string(self) -> String {
        self.value.to_string()
    }
}
