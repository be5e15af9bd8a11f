/*
    MSAFox
    https://github.com/dbalsom/msafox

    Copyright 2024-2025 Daniel Balsom

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.

    --------------------------------------------------------------------------
*/

//! Building a source tree from a host directory.
//!
//! The walk is recursive, skips hidden entries, and materializes every file
//! payload up front. An unreadable file fails the whole tree build rather
//! than leaving an entry with no payload behind.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    file_system::{FileEntry, FileSystemError, FileTreeNode, FsDateTime},
    FoxHashSet,
};

pub fn build_file_tree(path: impl AsRef<Path>) -> Result<FileTreeNode, FileSystemError> {
    let path = PathBuf::from(path.as_ref());
    let root_dir = fs::read_dir(&path)?;
    let mut path_stack = Vec::new();
    let mut visited_dirs = FoxHashSet::new();
    build_file_tree_recursive(None, root_dir, &mut path_stack, &mut visited_dirs)
}

fn build_file_tree_recursive(
    dir_entry: Option<&fs::DirEntry>,
    dir: fs::ReadDir,
    path_stack: &mut Vec<String>,
    visited_dirs: &mut FoxHashSet<PathBuf>,
) -> Result<FileTreeNode, FileSystemError> {
    let mut children = Vec::new();

    if let Some(dir_entry) = dir_entry {
        path_stack.push(dir_entry.file_name().to_string_lossy().to_string());
    }

    for entry_res in dir {
        let entry = entry_res?;
        let file_type = entry.file_type()?;

        let path = entry.path();
        let entry_name = entry.file_name().to_string_lossy().to_string();

        // Skip hidden entries. This also covers "." and "..", which would
        // otherwise send us in circles.
        if entry_name.starts_with('.') {
            continue;
        }

        let full_path = if path_stack.is_empty() {
            entry_name.clone()
        }
        else {
            format!("{}/{}", path_stack.join("/"), entry_name)
        };

        let modified = entry
            .metadata()
            .ok()
            .and_then(|md| md.modified().ok())
            .map(FsDateTime::from);

        if file_type.is_dir() {
            // Attempt to canonicalize to detect symlinks. If we've seen this
            // directory before, we have a cycle.
            let real_path = path.canonicalize()?;
            if visited_dirs.contains(&real_path) {
                return Err(FileSystemError::CycleError);
            }
            visited_dirs.insert(real_path);

            log::debug!("Descending into dir: {}", full_path);
            let sub_dir = fs::read_dir(&path)?;
            let new_node = build_file_tree_recursive(Some(&entry), sub_dir, path_stack, visited_dirs)?;
            children.push(new_node);
        }
        else if file_type.is_file() {
            let data = fs::read(&path).map_err(|e| {
                log::error!("Failed to read host file {}: {}", path.display(), e);
                FileSystemError::ReadError(path.to_string_lossy().to_string())
            })?;

            log::trace!("Adding file: {} ({} bytes)", full_path, data.len());
            children.push(FileTreeNode::File(FileEntry::new_file(
                entry_name, full_path, data, modified,
            )));
        }
        else {
            // Not a file or directory?
            return Err(FileSystemError::UnsupportedFileObject(
                path.to_string_lossy().to_string(),
            ));
        }
    }

    let node = FileTreeNode::Directory {
        dfe: FileEntry::new_directory(
            dir_entry
                .map(|e| e.file_name().to_string_lossy().to_string())
                .unwrap_or_default(),
            if path_stack.is_empty() {
                "/".to_string()
            }
            else {
                path_stack.join("/")
            },
            dir_entry
                .and_then(|e| e.metadata().ok())
                .and_then(|md| md.modified().ok())
                .map(FsDateTime::from),
        ),
        children,
    };

    path_stack.pop();

    Ok(node)
}
