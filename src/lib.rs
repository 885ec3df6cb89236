pub mod config;
pub mod constant;
pub mod controller;
pub mod custom_err;
pub mod http_param;
pub mod view;
