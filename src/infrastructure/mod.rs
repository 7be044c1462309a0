pub mod logging;
pub mod serial;
