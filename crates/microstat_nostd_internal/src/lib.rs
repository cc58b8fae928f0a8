#![no_std]
extern crate alloc;

mod error;
mod misc;
mod path;
mod stamp;

pub use error::InternalError;
pub use misc::{View3DSpec, midpoint, unpack3d};
pub use path::{PathMode, VoxelPath, voxel_path};
pub use stamp::{n_stamp_points, stamp_points};
