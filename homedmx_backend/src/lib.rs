pub mod api_utilities;
pub mod init;
pub mod mixer_utils;
pub mod plugins;
pub mod utilities;

pub use init::async_main;
