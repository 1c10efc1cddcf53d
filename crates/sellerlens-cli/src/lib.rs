//! SellerLens command line front end

pub mod cli;
pub mod io;
pub mod runner;

pub use cli::{Cli, Commands};
pub use runner::{run_batch, BatchReport};
