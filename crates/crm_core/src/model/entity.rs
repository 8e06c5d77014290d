//! Shared identity model and the per-kind entity contract.
//!
//! # Responsibility
//! - Define store-assigned identity (`EntityId`) and the stored `Record<T>`
//!   envelope shared by every entity kind.
//! - Define loosely-typed identity input (`RawId`) and its normalization.
//! - Define the `Entity` contract used by the generic store and service.
//!
//! # Invariants
//! - `EntityId` is always a positive integer.
//! - `Record::id` and `Record::created_at` are owned by the store; entity
//!   payloads and patches have no way to express them.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Positive integer identity, unique within one entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct EntityId(u64);

impl EntityId {
    /// Identity assigned to the first record of an empty collection.
    pub const FIRST: EntityId = EntityId(1);

    /// Returns `None` for zero.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// Next identity in sequence, or `None` once the id space is exhausted.
    pub fn checked_next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<u64> for EntityId {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ValidationError::ZeroId)
    }
}

impl From<EntityId> for u64 {
    fn from(value: EntityId) -> Self {
        value.0
    }
}

impl Display for EntityId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity value as it arrives from callers: any numeric-looking primitive.
///
/// Normalization accepts positive integers, integral finite floats and
/// trimmed text that parses as one of those. Everything else is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum RawId {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    /// Normalizes to a positive integer identity.
    pub fn normalize(&self) -> Option<EntityId> {
        match self {
            Self::Unsigned(value) => EntityId::new(*value),
            Self::Signed(value) => u64::try_from(*value).ok().and_then(EntityId::new),
            Self::Float(value) => float_to_id(*value),
            Self::Text(text) => {
                let trimmed = text.trim();
                match trimmed.parse::<u64>() {
                    Ok(value) => EntityId::new(value),
                    Err(_) => trimmed.parse::<f64>().ok().and_then(float_to_id),
                }
            }
        }
    }

    /// Whether this value means "no reference at all" (blank text or zero).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Unsigned(value) => *value == 0,
            Self::Signed(value) => *value == 0,
            Self::Float(value) => *value == 0.0,
            Self::Text(text) => text.trim().is_empty(),
        }
    }
}

fn float_to_id(value: f64) -> Option<EntityId> {
    if !value.is_finite() || value.fract() != 0.0 || value < 1.0 || value > u64::MAX as f64 {
        return None;
    }
    EntityId::new(value as u64)
}

impl Display for RawId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unsigned(value) => write!(f, "{value}"),
            Self::Signed(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(text) => write!(f, "{text}"),
        }
    }
}

impl From<EntityId> for RawId {
    fn from(value: EntityId) -> Self {
        Self::Unsigned(value.get())
    }
}

impl From<u32> for RawId {
    fn from(value: u32) -> Self {
        Self::Unsigned(u64::from(value))
    }
}

impl From<u64> for RawId {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<usize> for RawId {
    fn from(value: usize) -> Self {
        Self::Unsigned(value as u64)
    }
}

impl From<i32> for RawId {
    fn from(value: i32) -> Self {
        Self::Signed(i64::from(value))
    }
}

impl From<i64> for RawId {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<f64> for RawId {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for RawId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for RawId {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl<'de> Deserialize<'de> for RawId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawIdVisitor;

        impl<'de> Visitor<'de> for RawIdVisitor {
            type Value = RawId;

            fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str("an integer or integer-like string")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<RawId, E> {
                Ok(RawId::Unsigned(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<RawId, E> {
                Ok(RawId::Signed(value))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<RawId, E> {
                Ok(RawId::Float(value))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<RawId, E> {
                Ok(RawId::Text(value.to_string()))
            }
        }

        deserializer.deserialize_any(RawIdVisitor)
    }
}

/// Deserializes a loose foreign reference: numbers and integer-like text
/// become an id; `null`, blank text and zero mean "no reference".
pub(crate) fn deserialize_loose_ref<'de, D>(
    deserializer: D,
) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<RawId>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.is_blank() => Ok(None),
        Some(raw) => raw
            .normalize()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid reference id `{raw}`"))),
    }
}

/// Entity kind tag used in errors and log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Contact,
    Company,
    Lead,
    Task,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Company => "company",
            Self::Lead => "lead",
            Self::Task => "task",
        }
    }

    /// Capitalized label for human-readable messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Contact => "Contact",
            Self::Company => "Company",
            Self::Lead => "Lead",
            Self::Task => "Task",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field constraint violations raised before a record is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Identity value `0` is never valid.
    ZeroId,
    /// Required text field is empty after trim.
    BlankField(&'static str),
    /// Email does not look like `local@domain.tld`.
    InvalidEmail(String),
    /// Lead value is negative, NaN or infinite.
    InvalidLeadValue,
    /// Lead probability outside `0..=100`.
    ProbabilityOutOfRange(u8),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroId => write!(f, "identity must be a positive integer"),
            Self::BlankField(field) => write!(f, "`{field}` must not be blank"),
            Self::InvalidEmail(value) => write!(f, "invalid email address: `{value}`"),
            Self::InvalidLeadValue => write!(f, "lead value must be a finite non-negative number"),
            Self::ProbabilityOutOfRange(value) => {
                write!(f, "probability must be between 0 and 100, got {value}")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Kind-specific payload stored by `EntityStore<T>`.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Kind tag for errors and log events.
    const KIND: EntityKind;

    /// Partial update applied by `EntityStore::replace`.
    type Patch: Clone + Default + Send + Sync + 'static;

    /// Merges every field present in `patch` over `self`.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Checks field constraints; called on every write path.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// One stored entity: store-owned identity plus the kind payload.
///
/// Serialized flat, with identity as `Id` and creation time as `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(rename = "Id")]
    pub id: EntityId,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Record<T> {
    pub fn new(id: EntityId, created_at: DateTime<Utc>, data: T) -> Self {
        Self {
            id,
            created_at,
            data,
        }
    }
}
