use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(Uuid);

impl ServiceId {
    pub fn parse(id: &str) -> Result<Self, ValidationError> {
        let parsed = uuid::Uuid::try_parse(id).map_err(|e| {
            ValidationError::new(format!("Invalid service ID: {e}"))
        })?;
        Ok(Self(parsed))
    }

    pub fn new(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for ServiceId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl AsRef<Uuid> for ServiceId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

/// Catalog entry a shift can be staffed for. Only the name is shown on shifts.
#[derive(Debug, Clone, PartialEq)]
pub struct SalonService {
    pub id: ServiceId,
    pub name: String,
    pub duration_minutes: i32,
    pub is_active: bool,
}

impl SalonService {
    pub fn new(name: String, duration_minutes: i32) -> Self {
        Self {
            id: ServiceId::default(),
            name,
            duration_minutes,
            is_active: true,
        }
    }
}
