pub mod config;
pub mod driver;
pub mod error;
pub mod headless;
pub mod kernel;
pub mod outputs;
pub mod ui;

pub use config::{GameConfig, Variant};
pub use driver::Driver;
pub use kernel::reactor::Reactor;
