pub mod config;
pub mod controller;
pub(crate) mod paths;
