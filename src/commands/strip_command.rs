//! Metadata scrubbing command

use clap::ArgMatches;
use log::info;

use crate::api::ExifScope;
use crate::commands::command_traits::Command;
use crate::exif::errors::{MetaError, MetaResult};

/// Command writing a metadata-free copy of one image
pub struct StripCommand<'a> {
    input_file: String,
    /// Destination; its extension picks the output format
    output_file: String,
    /// Comment embedded in the clean copy
    message: Option<String>,
    scope: &'a ExifScope,
}

impl<'a> StripCommand<'a> {
    /// Create a new strip command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `scope` - Library facade used for scrubbing
    ///
    /// # Returns
    /// A new StripCommand instance or an error
    pub fn new(args: &ArgMatches, scope: &'a ExifScope) -> MetaResult<Self> {
        let mut inputs = args.get_many::<String>("input").into_iter().flatten();
        let input_file = inputs
            .next()
            .ok_or_else(|| MetaError::GenericError("Missing input file".to_string()))?
            .clone();
        if inputs.next().is_some() {
            return Err(MetaError::GenericError("--strip takes exactly one input file".to_string()));
        }

        let output_file = args
            .get_one::<String>("strip")
            .ok_or_else(|| MetaError::GenericError("Missing output file for --strip".to_string()))?
            .clone();

        Ok(StripCommand {
            input_file,
            output_file,
            message: args.get_one::<String>("message").cloned(),
            scope,
        })
    }
}

impl<'a> Command for StripCommand<'a> {
    fn execute(&self) -> MetaResult<()> {
        info!("Stripping {} into {}", self.input_file, self.output_file);

        let outcome = self
            .scope
            .scrub_file(&self.input_file, &self.output_file, self.message.as_deref())?;

        if self.message.is_some() && !outcome.payload_embedded {
            println!(
                "Wrote {} without metadata; the comment could not be embedded in {:?} output",
                self.output_file, outcome.format
            );
        } else if outcome.payload_embedded {
            println!("Wrote {} without metadata, comment embedded", self.output_file);
        } else {
            println!("Wrote {} without metadata", self.output_file);
        }
        Ok(())
    }
}
