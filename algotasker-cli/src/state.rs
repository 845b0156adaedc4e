use algotasker_core::Task;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `$ALGOTASKER_HOME`, or `~/.algotasker`.
pub fn algotasker_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ALGOTASKER_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".algotasker"))
}

pub fn ensure_algotasker_home() -> Result<PathBuf> {
    let dir = algotasker_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn default_tasks_path() -> Result<PathBuf> {
    Ok(ensure_algotasker_home()?.join("tasks.json"))
}

/// Read a JSON array of task records and check each one.
pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let tasks: Vec<Task> =
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    for task in &tasks {
        task.validate()
            .with_context(|| format!("in {}", path.display()))?;
    }
    Ok(tasks)
}

pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
