pub mod install;
pub mod run;
pub mod status;
pub mod uninstall;
