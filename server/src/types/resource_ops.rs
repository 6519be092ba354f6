use shared::{HealthOp, StaminaOp};

/// A health mutation requested by the owning client.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum DbHealthOp {
    IncreaseCurrent(f32),
    DecreaseCurrent(f32),
    SetCurrent(f32),
    IncreaseMax(f32),
    DecreaseMax(f32),
    SetMax(f32),
    IncreaseBase(f32),
    DecreaseBase(f32),
    SetBase(f32),
    SetHealable(bool),
    SetDead(bool),
}

impl From<DbHealthOp> for HealthOp {
    fn from(op: DbHealthOp) -> Self {
        match op {
            DbHealthOp::IncreaseCurrent(v) => HealthOp::IncreaseCurrent(v),
            DbHealthOp::DecreaseCurrent(v) => HealthOp::DecreaseCurrent(v),
            DbHealthOp::SetCurrent(v) => HealthOp::SetCurrent(v),
            DbHealthOp::IncreaseMax(v) => HealthOp::IncreaseMax(v),
            DbHealthOp::DecreaseMax(v) => HealthOp::DecreaseMax(v),
            DbHealthOp::SetMax(v) => HealthOp::SetMax(v),
            DbHealthOp::IncreaseBase(v) => HealthOp::IncreaseBase(v),
            DbHealthOp::DecreaseBase(v) => HealthOp::DecreaseBase(v),
            DbHealthOp::SetBase(v) => HealthOp::SetBase(v),
            DbHealthOp::SetHealable(b) => HealthOp::SetHealable(b),
            DbHealthOp::SetDead(b) => HealthOp::SetDead(b),
        }
    }
}

/// A stamina mutation requested by the owning client.
#[derive(spacetimedb::SpacetimeType, Debug, Clone, Copy, PartialEq)]
pub enum DbStaminaOp {
    IncreaseCurrent(f32),
    DecreaseCurrent(f32),
    SetCurrent(f32),
    IncreaseMax(f32),
    DecreaseMax(f32),
    SetMax(f32),
}

impl From<DbStaminaOp> for StaminaOp {
    fn from(op: DbStaminaOp) -> Self {
        match op {
            DbStaminaOp::IncreaseCurrent(v) => StaminaOp::IncreaseCurrent(v),
            DbStaminaOp::DecreaseCurrent(v) => StaminaOp::DecreaseCurrent(v),
            DbStaminaOp::SetCurrent(v) => StaminaOp::SetCurrent(v),
            DbStaminaOp::IncreaseMax(v) => StaminaOp::IncreaseMax(v),
            DbStaminaOp::DecreaseMax(v) => StaminaOp::DecreaseMax(v),
            DbStaminaOp::SetMax(v) => StaminaOp::SetMax(v),
        }
    }
}
