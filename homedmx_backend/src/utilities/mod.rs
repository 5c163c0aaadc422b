pub mod color;
pub mod config;
pub mod value_codec;
