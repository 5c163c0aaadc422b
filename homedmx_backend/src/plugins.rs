pub mod patcher;

#[cfg(feature = "output-enttecpro")]
pub mod output_dmx_enttecpro;
#[cfg(feature = "stdio-api")]
pub mod stdio_api;
