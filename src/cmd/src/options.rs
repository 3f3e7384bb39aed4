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
use columnar_meta::WriterOptions;
use common_telemetry::logging::LoggingOptions;
use config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::error::{LoadLayeredConfigSnafu, Result, SerdeJsonSnafu, TomlFormatSnafu};

/// Prefix of environment variables, e.g. `FOOTER_TOOL__WRITER__SYNC_ON_FINISH`.
pub const ENV_VAR_PREFIX: &str = "FOOTER_TOOL";

/// Separator for environment variables.
pub const ENV_VAR_SEP: &str = "__";

#[derive(Parser, Default, Debug, Clone)]
pub struct GlobalOptions {
    /// Config file in TOML format.
    #[clap(short, long, value_name = "FILE")]
    #[arg(global = true)]
    pub config_file: Option<String>,

    #[clap(long, value_name = "LOG_DIR")]
    #[arg(global = true)]
    pub log_dir: Option<String>,

    #[clap(long, value_name = "LOG_LEVEL")]
    #[arg(global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolOptions {
    pub logging: LoggingOptions,
    pub writer: WriterOptions,
}

impl ToolOptions {
    /// Loads the options from multiple sources and merges them.
    /// The precedence order is: config file > environment variables > default values.
    /// Command line flags in `global` override all of them.
    pub fn load(global: &GlobalOptions) -> Result<Self> {
        let mut opts = Self::load_layered_options(global.config_file.as_deref(), ENV_VAR_PREFIX)?;

        if let Some(dir) = &global.log_dir {
            opts.logging.dir.clone_from(dir);
        }
        if global.log_level.is_some() {
            opts.logging.level.clone_from(&global.log_level);
        }

        Ok(opts)
    }

    fn load_layered_options(config_file: Option<&str>, env_prefix: &str) -> Result<Self> {
        let default_opts = Self::default();

        let env_source = {
            let mut env = Environment::default();

            if !env_prefix.is_empty() {
                env = env.prefix(env_prefix);
            }

            env.try_parsing(true)
                .separator(ENV_VAR_SEP)
                .ignore_empty(true)
        };

        let json_str = serde_json::to_string(&default_opts).context(SerdeJsonSnafu)?;
        let default_config = File::from_str(&json_str, FileFormat::Json);

        let mut layered_config = config::Config::builder()
            .add_source(default_config)
            .add_source(env_source);

        if let Some(config_file) = config_file {
            layered_config = layered_config.add_source(File::new(config_file, FileFormat::Toml));
        }

        layered_config
            .build()
            .and_then(|x| x.try_deserialize())
            .context(LoadLayeredConfigSnafu)
    }

    /// Serializes the options to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string(&self).context(TomlFormatSnafu)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use common_telemetry::logging::LogFormat;
    use common_test_util::temp_dir::create_named_temp_file;

    use super::*;

    #[test]
    fn test_load_default_options() {
        let opts = ToolOptions::load(&GlobalOptions::default()).unwrap();
        assert_eq!(ToolOptions::default(), opts);
    }

    #[test]
    fn test_load_options_from_file() {
        let mut file = create_named_temp_file();
        let toml_str = r#"
            [logging]
            level = "debug"
            log_format = "json"

            [writer]
            write_buffer_size = 4096
            sync_on_finish = false
        "#;
        write!(file, "{}", toml_str).unwrap();

        let global = GlobalOptions {
            config_file: Some(file.path().to_str().unwrap().to_string()),
            log_dir: Some("/tmp/footer_tool_logs".to_string()),
            log_level: None,
        };
        let opts = ToolOptions::load(&global).unwrap();

        assert_eq!(Some("debug".to_string()), opts.logging.level);
        assert_eq!(LogFormat::Json, opts.logging.log_format);
        assert_eq!("/tmp/footer_tool_logs", opts.logging.dir);
        assert_eq!(4096, opts.writer.write_buffer_size);
        assert!(!opts.writer.sync_on_finish);
    }

    #[test]
    fn test_options_to_toml() {
        let toml_str = ToolOptions::default().to_toml().unwrap();
        let opts: ToolOptions = toml::from_str(&toml_str).unwrap();
        assert_eq!(ToolOptions::default(), opts);
    }
}
