pub mod config;
pub mod smbconf_applier;
pub mod smbconf_request;
pub mod smbconf_runner;
