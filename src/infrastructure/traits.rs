//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Line-oriented console dialogue.
pub trait Prompter: Send + Sync {
    /// Show `prompt` and return the entered line without its line ending.
    ///
    /// End of input is an `UnexpectedEof` error.
    fn ask(&self, prompt: &str) -> io::Result<String>;

    /// Show a message that needs no answer.
    fn notify(&self, message: &str);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                self.create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

/// Prompts on stdout (cyan), reads answers from stdin.
#[derive(Debug, Default)]
pub struct StdioPrompter;

impl Prompter for StdioPrompter {
    fn ask(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "\n{} ", prompt.cyan())?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before all answers were given",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notify(&self, message: &str) {
        println!("\n{}", message.yellow());
    }
}
