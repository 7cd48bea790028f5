//! C source emitters for display lists and collision data.

mod collision;
mod f3d;

pub use collision::{export_collision, CollisionExport, CollisionNames};
pub use f3d::{export_f3d, write_geometry, write_material, F3dExport};
