// Copyright 2023 Greptime Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod error;
pub mod finalize;
pub mod options;

use clap::{Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;

use crate::error::Result;
use crate::finalize::FinalizeCommand;
use crate::options::{GlobalOptions, ToolOptions};

pub const APP_NAME: &str = "footer-tool";

#[derive(Parser)]
#[clap(name = APP_NAME, about = "Writes footers of columnar data files")]
pub struct Command {
    #[clap(flatten)]
    pub global_options: GlobalOptions,

    #[clap(subcommand)]
    pub subcmd: SubCommand,
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Appends the footer of a manifest to a data file.
    Finalize(FinalizeCommand),
    /// Prints the effective options as TOML.
    PrintConfig,
}

impl Command {
    /// Loads options and installs logging. The guards must outlive the run.
    pub fn load_options(&self) -> Result<(ToolOptions, Vec<WorkerGuard>)> {
        let opts = ToolOptions::load(&self.global_options)?;
        let guards = common_telemetry::init_global_logging(APP_NAME, &opts.logging);
        Ok((opts, guards))
    }

    /// Runs the subcommand and returns the text to print.
    pub fn run(&self, opts: &ToolOptions) -> Result<String> {
        match &self.subcmd {
            SubCommand::Finalize(cmd) => {
                let report = cmd.run(&opts.writer)?;
                Ok(format!(
                    "footer_offset={} appended_bytes={} rows={}",
                    report.footer_offset, report.appended_bytes, report.row_count
                ))
            }
            SubCommand::PrintConfig => opts.to_toml(),
        }
    }
}
