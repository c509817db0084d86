pub(crate) mod resolver;
pub(crate) mod static_layout;
