use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// File name for an exported story: `"The Dice Game!"` becomes `the_dice_game.md`.
pub fn markdown_file_name(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .collect();
    let stem = kept.trim().replace(' ', "_").to_lowercase();

    if stem.is_empty() {
        "story.md".to_string()
    } else {
        format!("{stem}.md")
    }
}

pub fn render_markdown(title: &str, story: &str) -> String {
    format!("# {title}\n\n{story}")
}

/// Write the story to an explicit path (e.g. one picked in a save dialog).
pub fn write_markdown(path: &Path, title: &str, story: &str) -> Result<()> {
    fs::write(path, render_markdown(title, story))
        .with_context(|| format!("failed to write {}", path.display()))?;
    log::info!("Story exported to {}", path.display());
    Ok(())
}

/// Write the story into `dir` under a name derived from `title`.
pub fn export_to_dir(dir: &Path, title: &str, story: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let path = dir.join(markdown_file_name(title));
    write_markdown(&path, title, story)?;
    Ok(path)
}
