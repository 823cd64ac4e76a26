// SPDX-License-Identifier: GPL-3.0-only

//! LVM command relay for a single volume group
//!
//! This crate turns a small set of logical volume requests into `lvm`
//! invocations:
//! - `list` reports name, attributes, tags and size (bytes) as JSON
//! - `create` allocates a volume, optionally tagged
//! - `remove` force-removes a volume
//! - `change` edits tags and activation
//!
//! Commands run synchronously as argument vectors, never through a shell.
//! These operations require elevated privileges and should only be called
//! from privileged helpers.

pub mod cmd;
pub mod config;
pub mod error;
pub mod relay;

pub use cmd::{CommandRunner, DryRunRunner, SystemRunner};
pub use config::LvmConfig;
pub use error::{LvmError, Result};
pub use relay::{Activation, ChangeArgs, CreateArgs, ListArgs, LvOperation, LvRelay, RemoveArgs};
