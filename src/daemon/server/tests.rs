//! Tests for daemon server state checks.

use std::fs;

use tempfile::TempDir;

use super::core::{DaemonServer, DaemonStatus};

#[test]
fn test_check_status_not_running_on_empty_dir() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    assert_eq!(
        DaemonServer::check_status(temp_dir.path()),
        DaemonStatus::NotRunning
    );
    assert!(!DaemonServer::is_running(temp_dir.path()));
}

#[test]
fn test_stale_pid_file_is_cleaned_up() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let pid_path = temp_dir.path().join("runout.pid");
    // PID from a long-dead process range; no socket exists either.
    fs::write(&pid_path, "999999999").expect("Failed to write pid file");

    assert_eq!(
        DaemonServer::check_status(temp_dir.path()),
        DaemonStatus::NotRunning
    );
    assert!(!pid_path.exists());
}

#[test]
fn test_stale_socket_without_pid_is_cleaned_up() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let socket_path = temp_dir.path().join("runout.sock");
    // A plain file standing in for a leftover socket.
    fs::write(&socket_path, "").expect("Failed to write socket file");

    assert_eq!(
        DaemonServer::check_status(temp_dir.path()),
        DaemonStatus::NotRunning
    );
    assert!(!socket_path.exists());
}

#[test]
fn test_read_pid_parses_trimmed_content() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("runout.pid"), " 4242\n").expect("Failed to write pid");
    assert_eq!(DaemonServer::read_pid(temp_dir.path()), Some(4242));
}

#[test]
fn test_read_pid_rejects_garbage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("runout.pid"), "not-a-pid").expect("Failed to write pid");
    assert_eq!(DaemonServer::read_pid(temp_dir.path()), None);
}

#[test]
fn test_stop_fails_when_not_running() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let result = DaemonServer::stop(temp_dir.path());
    assert!(result.is_err());
}
