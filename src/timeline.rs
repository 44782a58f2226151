pub(crate) mod looping;
pub(crate) mod plan;
