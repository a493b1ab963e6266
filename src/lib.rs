//! Point an app bundle's executable at dylibs inside the bundle.
//!
//! Uses `otool -L` to read the libraries an executable links against and
//! `install_name_tool -change` to rewrite them, typically to
//! `@executable_path/../Frameworks/<name>`, copying the libraries into
//! `Contents/Frameworks` alongside. Neither tool is reimplemented here; both
//! sit behind the [`LinkEditor`] trait.

mod analyze;
mod bundle;
pub mod cli;
mod copy;
mod error;
mod frameworkify;
mod paths;
mod tools;

pub use analyze::parse_otool_output;
pub use bundle::{find_bundle, Bundle, FRAMEWORKS_DIR};
pub use copy::copy_to_frameworks;
pub use error::{Error, Result};
pub use frameworkify::{frameworkify, plan_rewrites, Options, Rewrite};
pub use paths::{find_matching_library, new_reference, DEFAULT_PREFIX};
pub use tools::{Cctools, LinkEditor, ToolConfig};
