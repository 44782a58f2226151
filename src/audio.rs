pub(crate) mod catalog;
pub(crate) mod compose;
pub(crate) mod mix;
pub(crate) mod select;
