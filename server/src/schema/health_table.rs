use shared::{Health, NetRole, Resource};
use spacetimedb::*;

/// Replicated health of a live character.
///
/// Subscribers receive every row change; this table is the replication channel for health.
#[table(name = health_tbl, public)]
#[derive(Debug, Clone, PartialEq)]
pub struct HealthRow {
    #[primary_key]
    pub character_id: u64,
    pub base: f32,
    pub current: f32,
    pub max: f32,
    pub healable: bool,
    pub dead: bool,
}

impl HealthRow {
    pub fn from_health(character_id: u64, health: &Health) -> Self {
        Self {
            character_id,
            base: health.base(),
            current: health.current(),
            max: health.max(),
            healable: health.is_healable(),
            dead: health.dead(),
        }
    }

    /// `dead` is derived from `current` on load.
    pub fn to_health(&self) -> Health {
        Health::from_parts(
            NetRole::Authority,
            self.base,
            self.current,
            self.max,
            self.healable,
        )
    }

    pub fn insert(ctx: &ReducerContext, character_id: u64, health: &Health) -> Self {
        ctx.db
            .health_tbl()
            .insert(Self::from_health(character_id, health))
    }

    /// Writes `health` back, skipping the update when nothing changed.
    pub fn store(self, ctx: &ReducerContext, health: &Health) {
        let next = Self::from_health(self.character_id, health);
        if next != self {
            ctx.db.health_tbl().character_id().update(next);
        }
    }
}
