pub(crate) mod pipeline;
pub(crate) mod step;
pub(crate) mod steps;
