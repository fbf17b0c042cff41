//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type. Semantic elements, DI records and the
//! diagram elements built from them are all keyed by `Id`, so equality and hashing
//! must be cheap: they compare interned symbols instead of strings.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock")
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use chorus_core::identifier::Id;
///
/// let participant = Id::new("Participant_A");
/// let task = Id::new("ChoreographyTask_1");
///
/// // Participant bands are keyed by participant and activity
/// let band = participant.joined(task, "_");
/// assert_eq!(band, "Participant_A_ChoreographyTask_1");
///
/// // External labels hang off their owner
/// assert_eq!(task.with_suffix("_label"), "ChoreographyTask_1_label");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Creates a new ID by appending `suffix` to this identifier.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        let mut interner = interner();
        let base = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        let name = format!("{base}{suffix}");
        Self(interner.get_or_intern(&name))
    }

    /// Creates a new ID by combining this identifier and `other` with `separator`.
    ///
    /// # Arguments
    ///
    /// * `other` - The identifier to append.
    /// * `separator` - Text placed between the two identifiers.
    pub fn joined(&self, other: Id, separator: &str) -> Self {
        let mut interner = interner();
        let first = interner
            .resolve(self.0)
            .expect("First ID should exist in interner");
        let second = interner
            .resolve(other.0)
            .expect("Second ID should exist in interner");
        let name = format!("{first}{separator}{second}");
        Self(interner.get_or_intern(&name))
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let interner = interner();
        let str_value = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        write!(f, "{str_value}")
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        let interner = interner();
        let self_str = interner
            .resolve(self.0)
            .expect("Symbol should exist in interner");
        self_str == other
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Id::new(&name))
    }
}
