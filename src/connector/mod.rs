pub(crate) mod path;
pub(crate) mod pool;
pub(crate) mod state;
pub(crate) mod stepper;
