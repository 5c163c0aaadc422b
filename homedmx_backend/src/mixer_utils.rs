pub mod default_blender;
pub mod state;
