use shared::{NetRole, Resource, Stamina, StaminaSettings, TimerHandle};
use spacetimedb::*;

/// Replicated stamina of a live character.
///
/// `timer_id` points at the `stamina_tick_timer` row driving drain and regen, if any.
#[table(name = stamina_tbl, public)]
#[derive(Debug, Clone, PartialEq)]
pub struct StaminaRow {
    #[primary_key]
    pub character_id: u64,
    pub current: f32,
    pub max: f32,
    pub has_stamina: bool,
    pub can_sprint: bool,
    pub timer_id: Option<u64>,
}

impl StaminaRow {
    pub fn from_stamina(character_id: u64, stamina: &Stamina) -> Self {
        Self {
            character_id,
            current: stamina.current(),
            max: stamina.max(),
            has_stamina: stamina.has_stamina(),
            can_sprint: stamina.can_sprint(),
            timer_id: stamina.timer_handle().map(|h| h.0),
        }
    }

    pub fn to_stamina(&self, settings: StaminaSettings) -> Stamina {
        let mut stamina = Stamina::from_parts(NetRole::Authority, self.current, self.max, settings);
        stamina.set_timer_handle(self.timer_id.map(TimerHandle));
        stamina
    }

    pub fn insert(ctx: &ReducerContext, character_id: u64, stamina: &Stamina) -> Self {
        ctx.db
            .stamina_tbl()
            .insert(Self::from_stamina(character_id, stamina))
    }

    pub fn store(self, ctx: &ReducerContext, stamina: &Stamina) {
        let next = Self::from_stamina(self.character_id, stamina);
        if next != self {
            ctx.db.stamina_tbl().character_id().update(next);
        }
    }
}
