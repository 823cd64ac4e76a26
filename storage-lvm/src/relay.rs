// SPDX-License-Identifier: GPL-3.0-only

//! Translation of logical volume requests into `lvm` invocations.
//!
//! Every operation builds one argument vector and runs it once through a
//! [`CommandRunner`]. Only `list` relays the tool's stdout; the mutating
//! operations produce no output on success.

use clap::ValueEnum;

use crate::cmd::{CommandRunner, SystemRunner};
use crate::config::LvmConfig;
use crate::error::Result;

const LIST_COLUMNS: &str = "name,attr,tags,size";

/// Activation directive for `lvchange --activate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Activation {
    #[value(name = "y")]
    Activate,
    #[value(name = "n")]
    Deactivate,
}

impl Activation {
    pub fn as_str(self) -> &'static str {
        match self {
            Activation::Activate => "y",
            Activation::Deactivate => "n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListArgs {
    pub lv_name: String,
}

/// Thin-provisioned volumes are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateArgs {
    pub size: String,
    pub lv_name: String,
    pub addtag: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveArgs {
    pub lv_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeArgs {
    pub lv_name: String,
    pub addtag: Vec<String>,
    pub deltag: Vec<String>,
    pub activate: Option<Activation>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LvOperation {
    List(ListArgs),
    Create(CreateArgs),
    Remove(RemoveArgs),
    Change(ChangeArgs),
}

impl LvOperation {
    pub fn name(&self) -> &'static str {
        match self {
            LvOperation::List(_) => "list",
            LvOperation::Create(_) => "create",
            LvOperation::Remove(_) => "remove",
            LvOperation::Change(_) => "change",
        }
    }

    /// Whether the tool's stdout is relayed to the caller.
    pub fn relays_output(&self) -> bool {
        matches!(self, LvOperation::List(_))
    }
}

fn push_tags(args: &mut Vec<String>, flag: &str, tags: &[String]) {
    for tag in tags {
        args.push(flag.to_string());
        args.push(tag.clone());
    }
}

/// Issues LVM commands against the configured volume group.
#[derive(Debug, Clone)]
pub struct LvRelay<R = SystemRunner> {
    config: LvmConfig,
    runner: R,
}

impl LvRelay<SystemRunner> {
    pub fn system(config: LvmConfig) -> Self {
        Self::new(config, SystemRunner)
    }
}

impl<R: CommandRunner> LvRelay<R> {
    pub fn new(config: LvmConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Arguments passed to the LVM binary for `operation`, binary excluded.
    pub fn build_args(&self, operation: &LvOperation) -> Vec<String> {
        let group = &self.config.volume_group;
        match operation {
            LvOperation::List(args) => vec![
                "lvs".to_string(),
                "--reportformat".to_string(),
                "json".to_string(),
                "--units".to_string(),
                "b".to_string(),
                "--nosuffix".to_string(),
                "-o".to_string(),
                LIST_COLUMNS.to_string(),
                "--select".to_string(),
                format!("lv_name = {}", args.lv_name),
                group.clone(),
            ],
            LvOperation::Create(args) => {
                let mut cmd = vec![
                    "lvcreate".to_string(),
                    "-L".to_string(),
                    args.size.clone(),
                    "-n".to_string(),
                    args.lv_name.clone(),
                    group.clone(),
                ];
                push_tags(&mut cmd, "--addtag", &args.addtag);
                cmd
            }
            LvOperation::Remove(args) => vec![
                "lvremove".to_string(),
                "-f".to_string(),
                self.config.lv_path(&args.lv_name),
            ],
            LvOperation::Change(args) => {
                let mut cmd = vec!["lvchange".to_string()];
                push_tags(&mut cmd, "--addtag", &args.addtag);
                push_tags(&mut cmd, "--deltag", &args.deltag);
                if let Some(activate) = args.activate {
                    cmd.push("--activate".to_string());
                    cmd.push(activate.as_str().to_string());
                }
                cmd.push(self.config.lv_path(&args.lv_name));
                cmd
            }
        }
    }

    /// Run `operation` once and return the bytes to write to stdout.
    ///
    /// Empty for every operation except `list`.
    pub fn execute(&self, operation: &LvOperation) -> Result<Vec<u8>> {
        let args = self.build_args(operation);
        tracing::debug!(
            "{} in volume group {}",
            operation.name(),
            self.config.volume_group
        );

        let stdout = self.runner.run(&self.config.lvm_path, &args)?;
        if operation.relays_output() {
            Ok(stdout)
        } else {
            Ok(Vec::new())
        }
    }

    pub fn list(&self, lv_name: &str) -> Result<Vec<u8>> {
        self.execute(&LvOperation::List(ListArgs {
            lv_name: lv_name.to_string(),
        }))
    }

    pub fn create(&self, size: &str, lv_name: &str, addtag: &[String]) -> Result<()> {
        self.execute(&LvOperation::Create(CreateArgs {
            size: size.to_string(),
            lv_name: lv_name.to_string(),
            addtag: addtag.to_vec(),
        }))
        .map(|_| ())
    }

    pub fn remove(&self, lv_name: &str) -> Result<()> {
        self.execute(&LvOperation::Remove(RemoveArgs {
            lv_name: lv_name.to_string(),
        }))
        .map(|_| ())
    }

    pub fn change(
        &self,
        lv_name: &str,
        addtag: &[String],
        deltag: &[String],
        activate: Option<Activation>,
    ) -> Result<()> {
        self.execute(&LvOperation::Change(ChangeArgs {
            lv_name: lv_name.to_string(),
            addtag: addtag.to_vec(),
            deltag: deltag.to_vec(),
            activate,
        }))
        .map(|_| ())
    }
}
