//! Persisting split documents into a folder named after their source file.

pub mod naming;

pub use naming::{
    CollisionPolicy, DEFAULT_UNTITLED_NAME, assign_file_names, container_name, file_safe_name,
};

use relative_path::{RelativePath, RelativePathBuf};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::splitting::{SplitError, SplitOptions, split_bytes};

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error("File already exists: {0}")]
    Collision(PathBuf),
    #[error("Invalid output directory: {0}")]
    InvalidOutputDir(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandOptions {
    pub split: SplitOptions,
    pub on_collision: CollisionPolicy,
    /// File stem used for documents whose title is empty or unusable.
    pub untitled_name: String,
}

impl Default for ExpandOptions {
    fn default() -> Self {
        Self {
            split: SplitOptions::default(),
            on_collision: CollisionPolicy::default(),
            untitled_name: DEFAULT_UNTITLED_NAME.to_string(),
        }
    }
}

/// A split document and where it goes, relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDocument {
    pub title: String,
    pub relative_path: RelativePathBuf,
    pub content: String,
}

/// The documents one source file expands into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    /// Folder holding the documents, relative to the output root.
    pub container: RelativePathBuf,
    pub documents: Vec<PlannedDocument>,
}

/// Read a source document as raw bytes
pub fn read_file(path: &Path) -> Result<Vec<u8>, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    fs::read(path).map_err(IoError::Io)
}

/// Write content to a file, replacing any existing file
pub fn write_file(relative_path: &RelativePath, root: &Path, content: &str) -> Result<(), IoError> {
    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    fs::write(&absolute_path, content).map_err(IoError::Io)
}

/// Write content to a file that must not exist yet
pub fn write_new_file(
    relative_path: &RelativePath,
    root: &Path,
    content: &str,
) -> Result<(), IoError> {
    use std::io::Write;

    let absolute_path = relative_path.to_path(root);

    if let Some(parent) = absolute_path.parent() {
        fs::create_dir_all(parent).map_err(IoError::Io)?;
    }

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&absolute_path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => IoError::Collision(absolute_path.clone()),
            _ => IoError::Io(e),
        })?;
    file.write_all(content.as_bytes()).map_err(IoError::Io)
}

pub fn validate_output_dir(path: &Path) -> Result<(), IoError> {
    if !path.exists() || !path.is_dir() {
        return Err(IoError::InvalidOutputDir(format!(
            "{} is not a directory",
            path.display()
        )));
    }

    Ok(())
}

/// Split `source` and decide the file name of every resulting document
/// without writing anything.
pub fn plan_expansion(
    source: &Path,
    output_root: &Path,
    options: &ExpandOptions,
) -> Result<Expansion, IoError> {
    validate_output_dir(output_root)?;

    let bytes = read_file(source)?;
    let documents = split_bytes(&bytes, &options.split)?;

    let container = RelativePathBuf::from(container_name(source));
    let taken = existing_file_names(&container.to_path(output_root))?;
    let names = assign_file_names(
        documents.iter().map(|d| d.title.as_str()),
        options.on_collision,
        &options.untitled_name,
        &taken,
    )?;

    let documents = documents
        .into_iter()
        .zip(names)
        .map(|(doc, name)| PlannedDocument {
            title: doc.title,
            relative_path: container.join(name.as_str()),
            content: doc.content,
        })
        .collect();

    Ok(Expansion {
        container,
        documents,
    })
}

/// Split `source` into one file per level-1 section under
/// `<output_root>/<source base name>/`.
///
/// The folder is created before any document is written and only when there
/// is at least one document.
pub fn expand_file(
    source: &Path,
    output_root: &Path,
    options: &ExpandOptions,
) -> Result<Expansion, IoError> {
    let expansion = plan_expansion(source, output_root, options)?;

    if expansion.documents.is_empty() {
        log::info!("{} has no level-1 headings, nothing to write", source.display());
        return Ok(expansion);
    }

    fs::create_dir_all(expansion.container.to_path(output_root)).map_err(IoError::Io)?;

    for doc in &expansion.documents {
        match options.on_collision {
            CollisionPolicy::Overwrite => write_file(&doc.relative_path, output_root, &doc.content)?,
            CollisionPolicy::Suffix | CollisionPolicy::Fail => {
                write_new_file(&doc.relative_path, output_root, &doc.content)?
            }
        }
        log::info!("wrote {}", doc.relative_path);
    }

    Ok(expansion)
}

fn existing_file_names(dir: &Path) -> Result<HashSet<String>, IoError> {
    let mut names = HashSet::new();
    if !dir.is_dir() {
        return Ok(names);
    }

    for entry in fs::read_dir(dir).map_err(IoError::Io)? {
        let entry = entry.map_err(IoError::Io)?;
        if let Some(name) = entry.file_name().to_str() {
            names.insert(name.to_string());
        }
    }

    Ok(names)
}
