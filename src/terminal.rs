//! Best-effort inline image preview in the terminal.
//!
//! Uses `imgcat` when it is installed, otherwise writes the iTerm2 inline
//! image escape sequence directly. Terminals without support simply show
//! nothing useful; failures are never fatal.

use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

const IMGCAT: &str = "imgcat";

/// Locate an executable on PATH
fn find_in_path(program: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

pub fn imgcat_available() -> bool {
    find_in_path(IMGCAT).is_some()
}

/// iTerm2 inline image escape sequence for `image_data`
pub fn iterm_escape(image_data: &[u8], width: u32) -> String {
    format!(
        "\x1b]1337;File=inline=1;width={}:{}\x07",
        width,
        STANDARD.encode(image_data)
    )
}

fn display_image_iterm<W: Write>(out: &mut W, image_data: &[u8], width: u32) -> std::io::Result<()> {
    writeln!(out, "{}", iterm_escape(image_data, width))?;
    out.flush()
}

fn display_image_imgcat(image_path: &Path, width: u32) {
    match Command::new(IMGCAT)
        .arg("-W")
        .arg(width.to_string())
        .arg(image_path)
        .status()
    {
        Ok(status) if !status.success() => log::debug!("imgcat exited with {}", status),
        Ok(_) => {}
        Err(e) => log::debug!("Failed to run imgcat: {}", e),
    }
}

fn display_with_imgcat(image_data: &[u8], width: u32) -> std::io::Result<()> {
    // Removed when dropped
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile()?;
    file.write_all(image_data)?;
    file.flush()?;
    display_image_imgcat(file.path(), width);
    Ok(())
}

/// Show an image inline, `width` in terminal cells. Returns false if nothing
/// could be written.
pub fn display_image(image_data: &[u8], width: u32) -> bool {
    if imgcat_available() {
        match display_with_imgcat(image_data, width) {
            Ok(()) => return true,
            Err(e) => log::debug!("imgcat preview failed, falling back to escape codes: {}", e),
        }
    }

    match display_image_iterm(&mut std::io::stdout().lock(), image_data, width) {
        Ok(()) => true,
        Err(e) => {
            log::debug!("Inline image preview failed: {}", e);
            false
        }
    }
}
