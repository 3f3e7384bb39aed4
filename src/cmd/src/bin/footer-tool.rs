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

use clap::Parser;
use cmd::Command;
use common_error::ext::ErrorExt;
use common_telemetry::error;

#[allow(clippy::print_stdout, clippy::print_stderr)]
fn main() {
    let cmd = Command::parse();

    let (opts, guards) = match cmd.load_options() {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("{}", e.output_msg());
            std::process::exit(1);
        }
    };

    match cmd.run(&opts) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            if e.status_code().should_log_error() {
                error!("Failed to run {}: {:?}", cmd::APP_NAME, e);
            }
            eprintln!("{}", e.output_msg());
            // Flush pending logs, `exit` skips destructors.
            drop(guards);
            std::process::exit(1);
        }
    }
}
