use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type InstrumentId = i64;

/// Persisted instrument record, one row of the `instrument` table.
///
/// Equality follows the identifier: two records with the same assigned id
/// are equal. A record without an id is only equal to itself.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct Instrument {
    pub id: Option<InstrumentId>,
    pub name: Option<String>,
}

impl Instrument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: InstrumentId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl PartialEq for Instrument {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Transfer shape used in request and response bodies.
///
/// Every field is optional so the same type can carry a sparse
/// merge-patch body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstrumentDto {
    #[serde(default)]
    pub id: Option<InstrumentId>,
    #[serde(default)]
    pub name: Option<String>,
}

impl InstrumentDto {
    pub fn new(id: Option<InstrumentId>, name: Option<String>) -> Self {
        Self { id, name }
    }
}

impl PartialEq for InstrumentDto {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        match (self.id, other.id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// Properties a list request may sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentProperty {
    Id,
    Name,
}

impl InstrumentProperty {
    pub fn column(&self) -> &'static str {
        match self {
            InstrumentProperty::Id => "id",
            InstrumentProperty::Name => "name",
        }
    }
}

impl FromStr for InstrumentProperty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id" => Ok(InstrumentProperty::Id),
            "name" => Ok(InstrumentProperty::Name),
            other => Err(format!("No property '{}' found for type 'Instrument'", other)),
        }
    }
}
