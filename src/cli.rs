//! Command line definition.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};

use crate::frameworkify::Options;
use crate::tools::ToolConfig;

/// Rewrite dylib references of a bundled executable to point into the bundle.
///
/// By default every named library is rewritten to
/// `@executable_path/../Frameworks/<name>` and copied into the bundle's
/// Frameworks folder.
#[derive(Parser, Debug)]
#[command(
    name = "frameworkify",
    version,
    after_help = "Example:\n    frameworkify MyApp.app/Contents/MacOS/MyApp /path/to/libfoo.dylib"
)]
pub struct Cli {
    /// Executable inside an app bundle (`<Name>.app/Contents/MacOS/<exe>`)
    pub executable: PathBuf,

    /// Libraries to rewrite; only the file name is matched against the executable
    #[arg(required = true)]
    pub libraries: Vec<PathBuf>,

    /// Alternative directory for the rewritten references
    #[arg(short = 'p', long = "path", value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Don't copy the libraries into the Frameworks folder
    #[arg(short = 'C', long = "nocopy")]
    pub nocopy: bool,

    /// otool program used to list linked libraries
    #[arg(long, env = "FRAMEWORKIFY_OTOOL", default_value = "otool", value_name = "PROGRAM")]
    pub otool: OsString,

    /// install_name_tool program used to rewrite references
    #[arg(
        long,
        env = "FRAMEWORKIFY_INSTALL_NAME_TOOL",
        default_value = "install_name_tool",
        value_name = "PROGRAM"
    )]
    pub install_name_tool: OsString,

    /// Give up on a tool that runs longer than this many seconds
    #[arg(long, env = "FRAMEWORKIFY_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log every step
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Reject option combinations that cannot be honoured.
    pub fn validate(&self) -> Result<(), clap::Error> {
        if self.path.is_some() && !self.nocopy {
            return Err(Self::command().error(
                ErrorKind::ArgumentConflict,
                "Path combined with copy operation is not supported",
            ));
        }
        Ok(())
    }

    pub fn options(&self) -> Options {
        Options {
            copy: !self.nocopy,
            path: self.path.clone(),
        }
    }

    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            otool: self.otool.clone(),
            install_name_tool: self.install_name_tool.clone(),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }
}
