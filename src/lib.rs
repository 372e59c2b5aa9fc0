pub mod cli;
pub mod error;
pub mod git;
pub mod model;
pub mod tally;
pub mod timeline;
pub mod util;
