//! Running generation targets

use std::path::Path;
use std::process::{Command, Stdio};

use crate::{Error, Result};

/// Run `command` with `working_dir` as its working directory.
///
/// The process inherits no stdin; stdout is discarded and stderr captured
/// for the error.
pub fn run_generator(command: &[String], working_dir: &Path) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Err(Error::configuration("generator command is empty"));
    };
    let rendered = command.join(" ");
    tracing::info!(command = %rendered, path = %working_dir.display(), "running generator");

    let output = Command::new(program)
        .args(args)
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| Error::GeneratorSpawn {
            command: rendered.clone(),
            path: working_dir.to_path_buf(),
            source,
        })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(Error::GeneratorFailed {
            command: rendered,
            path: working_dir.to_path_buf(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
