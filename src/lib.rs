pub mod config;
pub mod dispatch;
pub mod error;
pub mod io_struct;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod server;
