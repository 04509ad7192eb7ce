pub(crate) mod discover;
pub(crate) mod report;
pub(crate) mod runner;
