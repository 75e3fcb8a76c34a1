pub mod desktop;
pub mod http;
pub mod paths;
pub mod progress;

pub use desktop::Desktop;
