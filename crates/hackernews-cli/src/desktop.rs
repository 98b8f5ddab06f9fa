use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

/// OS side effects triggered by a selection. Both calls are fire-and-forget.
pub trait Desktop {
    fn open_url(&self, url: &str);
    fn copy_text(&self, text: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDesktop;

impl Desktop for SystemDesktop {
    fn open_url(&self, url: &str) {
        if let Err(error) = open::that_detached(url) {
            debug!(%url, %error, "failed to open url");
        }
    }

    fn copy_text(&self, text: &str) {
        for (program, args) in CLIPBOARD_COMMANDS {
            if pipe_into(program, args, text) {
                return;
            }
        }
        debug!("no clipboard utility accepted the text");
    }
}

type ClipboardCommand = (&'static str, &'static [&'static str]);

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[("pbcopy", &[])];

#[cfg(target_os = "windows")]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[("clip", &[])];

#[cfg(target_os = "linux")]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
];

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
const CLIPBOARD_COMMANDS: &[ClipboardCommand] = &[];

fn pipe_into(program: &str, args: &[&str], text: &str) -> bool {
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    let Ok(mut child) = child else {
        debug!(program, "clipboard utility unavailable");
        return false;
    };

    let written = child
        .stdin
        .take()
        .is_some_and(|mut stdin| stdin.write_all(text.as_bytes()).is_ok());

    // Dropping stdin above closes the pipe so the utility can exit.
    let succeeded = child.wait().map(|status| status.success()).unwrap_or(false);
    written && succeeded
}
