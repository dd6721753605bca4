pub mod config;
pub mod init;
pub mod scan;

pub use config::handle_config;
pub use init::handle_init;
pub use scan::handle_scan;
