use shared::{Door, DoorSettings};
use spacetimedb::*;

use crate::types::DbVec3;

/// A door placed in the world. Only `is_open` is authoritative; clients animate the swing.
#[table(name = door, public)]
#[derive(Debug, Clone)]
pub struct DoorRow {
    #[primary_key]
    #[auto_inc]
    pub id: u64,
    pub location: DbVec3,
    pub is_open: bool,
}

impl DoorRow {
    pub fn to_door(&self) -> Door {
        Door::new(self.id, self.is_open, DoorSettings::default())
    }
}
