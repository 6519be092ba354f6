mod character_table;
mod door_table;
mod gameplay_settings_table;
mod health_table;
mod move_ack_table;
mod player_table;
mod stamina_table;

pub use character_table::*;
pub use door_table::*;
pub use gameplay_settings_table::*;
pub use health_table::*;
pub use move_ack_table::*;
pub use player_table::*;
pub use stamina_table::*;
