//! CLI subcommand implementations

pub mod init_qvalues;
pub mod train;
