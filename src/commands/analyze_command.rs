//! Metadata report command
//!
//! Prints the report for every input file. Batches get a progress bar on
//! stderr so stdout carries nothing but reports.

use clap::ArgMatches;
use log::{info, warn};

use crate::analysis::report::{ComposedReport, ReportStatus};
use crate::api::ExifScope;
use crate::commands::command_traits::Command;
use crate::exif::errors::{MetaError, MetaResult};
use crate::utils::progress::ProgressTracker;

/// Command printing metadata reports
pub struct AnalyzeCommand<'a> {
    /// Files to analyse, in order
    inputs: Vec<String>,
    /// Print reports without HTML markup
    plain: bool,
    scope: &'a ExifScope,
}

impl<'a> AnalyzeCommand<'a> {
    /// Create a new analyze command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `scope` - Library facade used to build the reports
    ///
    /// # Returns
    /// A new AnalyzeCommand instance or an error
    pub fn new(args: &ArgMatches, scope: &'a ExifScope) -> MetaResult<Self> {
        let inputs: Vec<String> = args
            .get_many::<String>("input")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();

        if inputs.is_empty() {
            return Err(MetaError::GenericError("Missing input file".to_string()));
        }

        Ok(AnalyzeCommand {
            inputs,
            plain: args.get_flag("plain"),
            scope,
        })
    }

    fn render(&self, report: &ComposedReport) -> String {
        if self.plain {
            report.to_plain_text()
        } else {
            report.text.clone()
        }
    }
}

impl<'a> Command for AnalyzeCommand<'a> {
    fn execute(&self) -> MetaResult<()> {
        let tracker = if self.inputs.len() > 1 {
            Some(ProgressTracker::new(self.inputs.len() as u64, "Analysing"))
        } else {
            None
        };

        let mut unreadable = 0;
        for (index, input) in self.inputs.iter().enumerate() {
            if let Some(tracker) = &tracker {
                tracker.set_message(input);
            }

            let report = self.scope.analyze_file(input);
            if report.status == ReportStatus::Failed {
                warn!("{} could not be read", input);
                unreadable += 1;
            }

            if index > 0 {
                println!();
            }
            if self.inputs.len() > 1 {
                println!("== {} ==", input);
            }
            println!("{}", self.render(&report));

            if report.requires_file_delivery() {
                info!("Report for {} exceeds the inline limit ({} chars)", input, report.char_len);
            }

            if let Some(tracker) = &tracker {
                tracker.increment(1);
            }
        }

        if let Some(tracker) = &tracker {
            tracker.finish();
        }

        if unreadable > 0 {
            return Err(MetaError::GenericError(format!(
                "{} of {} files could not be read",
                unreadable,
                self.inputs.len()
            )));
        }
        Ok(())
    }
}
