//! Command pattern interfaces
//!
//! Each CLI operation is a `Command`; the factory inspects the parsed
//! arguments and picks one.

use crate::api::ExifScope;
use crate::exif::errors::MetaResult;

/// An executable CLI operation
pub trait Command {
    /// Execute the command
    ///
    /// # Returns
    /// Result indicating success or an error
    fn execute(&self) -> MetaResult<()>;
}

/// Creates commands from CLI arguments
pub trait CommandFactory<'a> {
    /// Create a new Command instance based on CLI arguments
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `scope` - Configured library facade the command runs against
    ///
    /// # Returns
    /// A command that implements the Command trait, or an error
    fn create_command(&self, args: &clap::ArgMatches, scope: &'a ExifScope) -> MetaResult<Box<dyn Command + 'a>>;
}
