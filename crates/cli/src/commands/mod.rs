pub(crate) mod admin;
pub(crate) mod analysis;
pub(crate) mod auth;
pub(crate) mod browse;
pub(crate) mod lists;
