mod init;
mod migrate;
mod status;

pub use init::cmd_init_config;
pub use migrate::cmd_migrate;
pub use status::cmd_status;
