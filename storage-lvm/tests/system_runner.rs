use std::path::Path;

use storage_lvm::{CommandRunner, LvRelay, LvmConfig, LvmError, SystemRunner};
use which::which;

#[test]
fn list_output_is_relayed_byte_for_byte() {
    let Ok(echo) = which("echo") else {
        return;
    };

    let relay = LvRelay::system(LvmConfig::new(echo, "test-vg"));
    let stdout = relay.list("vm1").unwrap();

    assert_eq!(
        String::from_utf8(stdout).unwrap(),
        "lvs --reportformat json --units b --nosuffix -o name,attr,tags,size --select lv_name = vm1 test-vg\n"
    );
}

#[test]
fn mutating_operations_discard_stdout() {
    let Ok(echo) = which("echo") else {
        return;
    };

    let relay = LvRelay::system(LvmConfig::new(echo, "test-vg"));
    relay.create("10G", "vm1", &["x".to_string()]).unwrap();
    relay.remove("vm1").unwrap();
    relay.change("vm1", &[], &[], None).unwrap();
}

#[test]
fn non_zero_exit_carries_status_and_both_streams() {
    let Ok(sh) = which("sh") else {
        return;
    };

    let args = vec![
        "-c".to_string(),
        "echo out; echo err >&2; exit 3".to_string(),
    ];
    let error = SystemRunner.run(&sh, &args).unwrap_err();

    match error {
        LvmError::CommandFailed {
            command,
            status,
            stdout,
            stderr,
        } => {
            assert_eq!(command[0], sh.to_string_lossy());
            assert_eq!(command[1..], args[..]);
            assert_eq!(status, Some(3));
            assert_eq!(stdout, "out\n");
            assert_eq!(stderr, "err\n");
        }
        other => panic!("expected CommandFailed, got {other:?}"),
    }
}

#[test]
fn arguments_are_not_shell_interpreted() {
    let Ok(echo) = which("echo") else {
        return;
    };

    let args = vec!["$HOME;".to_string(), "`id`".to_string()];
    let stdout = SystemRunner.run(&echo, &args).unwrap();
    assert_eq!(String::from_utf8(stdout).unwrap(), "$HOME; `id`\n");
}

#[test]
fn missing_binary_is_a_spawn_error() {
    let relay = LvRelay::system(LvmConfig::new(
        Path::new("/nonexistent/storage-lvm/lvm"),
        "test-vg",
    ));

    match relay.remove("vm1").unwrap_err() {
        LvmError::Spawn { command, .. } => {
            assert_eq!(
                command,
                vec!["/nonexistent/storage-lvm/lvm", "lvremove", "-f", "test-vg/vm1"]
            );
        }
        other => panic!("expected Spawn, got {other:?}"),
    }
}
