// Copyright (c) 2026 - present Kiarash Minoo
// SPDX-License-Identifier: MIT

//! Output sink: managed-block updates of the changelog file
//!
//! Rendered content lives between two fixed delimiter comments so hand-written
//! text around the block survives regeneration. Without delimiters in an
//! existing file the block is appended; a reset overwrites the whole file.

use std::path::Path;

use crate::checkpoint::StateError;

/// Opening delimiter of the managed block
pub const BLOCK_BEGIN: &str = "<!-- BEGIN AUTO-RELEASE-NOTES -->";
/// Closing delimiter of the managed block
pub const BLOCK_END: &str = "<!-- END AUTO-RELEASE-NOTES -->";

fn wrap(content: &str) -> String {
    format!("{BLOCK_BEGIN}\n{content}\n{BLOCK_END}\n")
}

/// Write rendered content into the target file.
///
/// With `overwrite` (or a missing target) the file becomes just the managed
/// block. Otherwise existing content between the delimiters is replaced,
/// preserving everything around it; files without delimiters get the block
/// appended.
///
/// # Errors
///
/// Returns `StateError::Io` on filesystem failure.
pub fn write_managed_block(path: &Path, content: &str, overwrite: bool) -> Result<(), StateError> {
    let block = wrap(content);

    if overwrite || !path.exists() {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, block)?;
        return Ok(());
    }

    let old = std::fs::read_to_string(path)?;
    let new = match (old.find(BLOCK_BEGIN), old.find(BLOCK_END)) {
        (Some(begin), Some(end)) if begin <= end => {
            let pre = &old[..begin];
            let post = &old[end + BLOCK_END.len()..];
            // The wrapped block carries its own trailing newline; drop the
            // one that followed the old closing delimiter to avoid doubling
            let post = post.strip_prefix('\n').unwrap_or(post);
            format!("{pre}{block}{post}")
        }
        _ => format!("{old}\n{block}"),
    };
    std::fs::write(path, new)?;
    Ok(())
}
