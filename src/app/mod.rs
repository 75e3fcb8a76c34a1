pub mod browse;
pub mod dispatch;
pub mod render;

pub use browse::Browser;
