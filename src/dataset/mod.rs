pub(crate) mod run;
pub(crate) mod sink;
pub(crate) mod writer;
