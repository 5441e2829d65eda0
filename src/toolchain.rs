//! Native C toolchain driver
//!
//! Writes the generated unit and the embedded list runtime into a private
//! temporary directory, then runs the C compiler over both:
//!
//! ```text
//! <cc> <tmp>/<stem>_temp.c <tmp>/wwe_list.c -o <output>
//! ```
//!
//! The compiler command may carry extra arguments (`"gcc -O2"`). The temporary
//! directory is removed when the build returns; `keep_c` copies the generated
//! unit next to the output first.

use crate::codegen::runtime::{HEADER_NAME, SOURCE_NAME, WWE_LIST_C, WWE_LIST_H};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("could not write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("the C compiler command is empty")]
    EmptyCommand,

    #[error("could not run C compiler '{cc}': {source}")]
    Spawn {
        cc: String,
        #[source]
        source: io::Error,
    },

    #[error("C compiler '{cc}' failed ({status}):\n{stderr}")]
    Failed {
        cc: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Result of a successful build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub executable: PathBuf,
    /// Copy of the generated C unit, when requested
    pub kept_source: Option<PathBuf>,
}

/// C compiler invocation settings
#[derive(Debug, Clone)]
pub struct Toolchain {
    cc: String,
    keep_c: bool,
}

impl Toolchain {
    pub fn new(cc: impl Into<String>) -> Self {
        Self {
            cc: cc.into(),
            keep_c: false,
        }
    }

    /// Keep the generated unit as `<output>_temp.c`
    pub fn keep_c(mut self, keep: bool) -> Self {
        self.keep_c = keep;
        self
    }

    /// Compile `c_source` together with the list runtime into `output`
    pub fn build(&self, c_source: &str, output: &Path) -> Result<BuildOutput, ToolchainError> {
        let mut parts = self.cc.split_whitespace();
        let program = parts.next().ok_or(ToolchainError::EmptyCommand)?;
        let extra_args: Vec<&str> = parts.collect();

        let workdir = tempfile::Builder::new()
            .prefix("wwec-")
            .tempdir()
            .map_err(|source| ToolchainError::Io {
                path: std::env::temp_dir(),
                source,
            })?;

        let stem = output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "program".to_string());
        let unit = workdir.path().join(format!("{}_temp.c", stem));
        let runtime_source = workdir.path().join(SOURCE_NAME);

        write_file(&unit, c_source)?;
        write_file(&workdir.path().join(HEADER_NAME), WWE_LIST_H)?;
        write_file(&runtime_source, WWE_LIST_C)?;

        let mut command = Command::new(program);
        command
            .args(&extra_args)
            .arg(&unit)
            .arg(&runtime_source)
            .arg("-o")
            .arg(output);
        debug!(?command, "invoking C compiler");

        let result = command.output().map_err(|source| ToolchainError::Spawn {
            cc: self.cc.clone(),
            source,
        })?;

        let kept_source = if self.keep_c {
            let kept = kept_source_path(output);
            write_file(&kept, c_source)?;
            Some(kept)
        } else {
            None
        };

        if !result.status.success() {
            return Err(ToolchainError::Failed {
                cc: self.cc.clone(),
                status: result.status,
                stderr: String::from_utf8_lossy(&result.stderr).into_owned(),
            });
        }

        info!(output = %output.display(), "built executable");
        Ok(BuildOutput {
            executable: output.to_path_buf(),
            kept_source,
        })
    }
}

impl Default for Toolchain {
    fn default() -> Self {
        Self::new("cc")
    }
}

/// `<output>_temp.c`, next to the output
pub fn kept_source_path(output: &Path) -> PathBuf {
    let mut name = output
        .file_name()
        .map(|s| s.to_os_string())
        .unwrap_or_default();
    name.push("_temp.c");
    output.with_file_name(name)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ToolchainError> {
    fs::write(path, contents).map_err(|source| ToolchainError::Io {
        path: path.to_path_buf(),
        source,
    })
}
