pub(crate) mod merge;
pub(crate) mod reverse;
