pub(crate) mod config;
pub(crate) mod parts;
pub(crate) mod sample;
