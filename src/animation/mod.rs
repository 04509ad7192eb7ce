pub(crate) mod fade;
pub(crate) mod keyframes;
pub(crate) mod loop_expand;
