//! CLI command implementations

pub mod command_traits;
pub mod analyze_command;
pub mod strip_command;

pub use command_traits::{Command, CommandFactory};
pub use analyze_command::AnalyzeCommand;
pub use strip_command::StripCommand;

use clap::{Arg, ArgAction, ArgMatches, Command as ClapCommand};

use crate::api::ExifScope;
use crate::exif::errors::MetaResult;

/// Argument definitions for the `exifscope` binary
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("exifscope")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Report EXIF/GPS metadata and digests of images, or write metadata-free copies")
        .arg(
            Arg::new("input")
                .help("Input image file(s)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("strip")
                .short('s')
                .long("strip")
                .help("Write a copy without metadata; the extension picks the format")
                .value_name("OUT")
                .required(false),
        )
        .arg(
            Arg::new("message")
                .short('m')
                .long("message")
                .help("Comment to embed in the stripped copy")
                .value_name("TEXT")
                .requires("strip")
                .required(false),
        )
        .arg(
            Arg::new("plain")
                .long("plain")
                .help("Print reports without HTML markup")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("allow-list")
                .long("allow-list")
                .help("Only report tags on the allow-list")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML configuration file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log records to this file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("More log output (repeatable)")
                .action(ArgAction::Count),
        )
}

/// Picks the command matching the CLI arguments
pub struct ExifscopeCommandFactory;

impl ExifscopeCommandFactory {
    pub fn new() -> Self {
        ExifscopeCommandFactory
    }
}

impl Default for ExifscopeCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CommandFactory<'a> for ExifscopeCommandFactory {
    fn create_command(&self, args: &ArgMatches, scope: &'a ExifScope) -> MetaResult<Box<dyn Command + 'a>> {
        if args.get_one::<String>("strip").is_some() {
            Ok(Box::new(StripCommand::new(args, scope)?))
        } else {
            Ok(Box::new(AnalyzeCommand::new(args, scope)?))
        }
    }
}
