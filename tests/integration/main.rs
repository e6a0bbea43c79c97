//! Integration tests for the vartier CLI.
//!
//! These tests drive the compiled binary end-to-end over temporary store
//! snapshots and panel files.

mod helpers;
mod test_enumerate_command;
mod test_report_command;
