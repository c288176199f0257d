//! Terminal status lines.
//!
//! Status lines go to stdout; logs and cause chains go to stderr.

use plugin_glb_converter::StatusReporter;

/// Print a success line
pub fn print_ok(msg: &str) {
    println!("[OK] {msg}");
}

/// Print a warning line
pub fn print_warning(msg: &str) {
    println!("[WARN] {msg}");
}

/// Print an error line
pub fn print_error(msg: &str) {
    println!("[ERROR] {msg}");
}

/// Print a full error chain to stderr
pub fn print_cause_chain(err: &anyhow::Error) {
    eprintln!("{err:?}");
}

/// Reporter writing `[WARN]` lines as the pipeline runs.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl StatusReporter for ConsoleReporter {
    fn warn(&mut self, message: &str) {
        print_warning(message);
    }
}
