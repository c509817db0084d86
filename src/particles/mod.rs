pub(crate) mod field;
