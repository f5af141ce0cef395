//! Native toolchain invocation for stubforge.
//!
//! Writes a [`StubDocument`](stubforge_targets::StubDocument) to a scoped
//! temporary file and runs exactly one external tool on it:
//!
//! - **Windows:** `lib /DEF:<stub> /OUT:<output>`
//! - **macOS:** `cc -dynamiclib -arch arm64 -arch x86_64 -Wl,-install_name,<base> <stub> -o <output>`
//! - **Linux:** `cc <stub> -fPIC -shared -Wl,-soname,<base> -o <output>`
//!
//! The temporary file is removed on every exit path.

pub mod command;
pub mod error;
pub mod invoke;

pub use command::ToolInvocation;
pub use error::ToolchainError;
pub use invoke::{BuildReport, ExecutionMode, ToolStatus, Toolchain, ToolchainConfig};
