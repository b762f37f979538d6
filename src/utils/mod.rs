pub mod logger;
pub mod progress;
pub(crate) mod string_utils;
pub(crate) mod write_utils;
