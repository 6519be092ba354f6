mod db_vec3;
mod movement;
mod resource_ops;

pub use db_vec3::*;
pub use movement::*;
pub use resource_ops::*;
