// SPDX-License-Identifier: GPL-3.0-only

use std::cell::RefCell;
use std::path::Path;
use std::process::Command;

use crate::error::{LvmError, Result};

/// Executes a program with an explicit argument vector.
///
/// Implementations return the captured stdout on a zero exit status and
/// [`LvmError::CommandFailed`] otherwise.
pub trait CommandRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>>;
}

pub fn render(program: &Path, args: &[String]) -> String {
    if args.is_empty() {
        program.display().to_string()
    } else {
        format!("{} {}", program.display(), args.join(" "))
    }
}

pub fn render_vector(command: &[String]) -> String {
    command.join(" ")
}

fn command_vector(program: &Path, args: &[String]) -> Vec<String> {
    let mut command = Vec::with_capacity(args.len() + 1);
    command.push(program.to_string_lossy().into_owned());
    command.extend(args.iter().cloned());
    command
}

/// Runs commands as real child processes, never through a shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>> {
        tracing::debug!("running {}", render(program, args));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|source| LvmError::Spawn {
                command: command_vector(program, args),
                source,
            })?;

        tracing::debug!("{} exited with {}", program.display(), output.status);

        if !output.status.success() {
            let error = LvmError::CommandFailed {
                command: command_vector(program, args),
                status: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            };
            tracing::debug!("{error}");
            return Err(error);
        }

        Ok(output.stdout)
    }
}

/// Records rendered commands instead of executing them.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    rendered: RefCell<Vec<String>>,
}

impl DryRunRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_rendered(self) -> Vec<String> {
        self.rendered.into_inner()
    }
}

impl CommandRunner for DryRunRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<Vec<u8>> {
        let rendered = render(program, args);
        tracing::info!("dry run: {rendered}");
        self.rendered.borrow_mut().push(rendered);
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_command_context() {
        let args = vec![
            "lvremove".to_string(),
            "-f".to_string(),
            "ovirt-local/vm1".to_string(),
        ];
        let rendered = render(Path::new("/usr/sbin/lvm"), &args);
        assert_eq!(rendered, "/usr/sbin/lvm lvremove -f ovirt-local/vm1");
        assert_eq!(render(Path::new("/usr/sbin/lvm"), &[]), "/usr/sbin/lvm");
    }

    #[test]
    fn command_vector_puts_program_first() {
        let args = vec!["lvs".to_string()];
        assert_eq!(
            command_vector(Path::new("/usr/sbin/lvm"), &args),
            vec!["/usr/sbin/lvm".to_string(), "lvs".to_string()]
        );
    }

    #[test]
    fn dry_run_never_executes() {
        let runner = DryRunRunner::new();
        let stdout = runner
            .run(Path::new("/nonexistent/lvm"), &["lvs".to_string()])
            .unwrap();
        assert!(stdout.is_empty());
        assert_eq!(runner.into_rendered(), vec!["/nonexistent/lvm lvs"]);
    }
}
