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

    src/file_system/file_tree.rs

    The in-memory source tree consumed by the FAT12 builder. File entries
    carry their full payload; the tree is built once by a producer and read
    once by the builder. Children keep producer insertion order, which is
    the order their directory records are laid out in.
*/

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::file_system::{date_time::FsDateTime, FileSystemError};

#[derive(Copy, Clone, Debug)]
pub enum FileEntryType {
    File,
    Directory,
}

#[derive(Clone)]
pub struct FileEntry {
    pub(crate) e_type: FileEntryType,
    pub(crate) short_name: String,
    pub(crate) path: String,
    pub(crate) size: u64,
    pub(crate) modified: Option<FsDateTime>,
    pub(crate) data: Vec<u8>,
}

impl Display for FileEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{} {:>10} {}",
            self.modified.as_ref().unwrap_or(&FsDateTime::default()),
            self.size,
            self.short_name
        )
    }
}

impl FileEntry {
    /// Create a file entry. The payload is materialized up front and owned
    /// by the entry for the lifetime of the tree.
    pub fn new_file(short_name: String, path: String, data: Vec<u8>, modified: Option<FsDateTime>) -> FileEntry {
        FileEntry {
            e_type: FileEntryType::File,
            short_name,
            path,
            size: data.len() as u64,
            modified,
            data,
        }
    }

    pub fn new_directory(short_name: String, path: String, modified: Option<FsDateTime>) -> FileEntry {
        FileEntry {
            e_type: FileEntryType::Directory,
            short_name,
            path,
            size: 0,
            modified,
            data: Vec::new(),
        }
    }

    /// Returns the display name of the entry, in whatever form the producer
    /// supplied. 8.3 truncation happens when the directory record is built,
    /// not here.
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Returns the full path of the entry relative to the tree root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the size of the file in bytes, or 0 for a directory.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn entry_type(&self) -> FileEntryType {
        self.e_type
    }

    pub fn is_file(&self) -> bool {
        matches!(self.e_type, FileEntryType::File)
    }

    pub fn is_dir(&self) -> bool {
        matches!(self.e_type, FileEntryType::Directory)
    }

    pub fn modified(&self) -> Option<&FsDateTime> {
        self.modified.as_ref()
    }
}

#[derive(Clone)]
pub enum FileTreeNode {
    File(FileEntry),
    Directory { dfe: FileEntry, children: Vec<FileTreeNode> },
}

impl Default for FileTreeNode {
    fn default() -> Self {
        FileTreeNode::Directory {
            dfe: FileEntry::new_directory("/".to_string(), "/".to_string(), None),
            children: Vec::new(),
        }
    }
}

impl Display for FileTreeNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            FileTreeNode::File(entry) => write!(f, "{}", entry),
            FileTreeNode::Directory { dfe, .. } => write!(f, "{}", dfe),
        }
    }
}

impl FileTreeNode {
    /// Create an empty root directory node.
    pub fn new_root() -> FileTreeNode {
        FileTreeNode::default()
    }

    pub fn entry(&self) -> &FileEntry {
        match self {
            FileTreeNode::File(entry) => entry,
            FileTreeNode::Directory { dfe, .. } => dfe,
        }
    }

    /// Returns `true` if the current node represents a file.
    pub fn is_file(&self) -> bool {
        matches!(self, FileTreeNode::File(_))
    }

    /// Returns `true` if the current node represents a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, FileTreeNode::Directory { .. })
    }

    /// Returns the children of a directory node, or `None` for a file.
    pub fn children(&self) -> Option<&[FileTreeNode]> {
        match self {
            FileTreeNode::File(_) => None,
            FileTreeNode::Directory { children, .. } => Some(children),
        }
    }

    /// Number of direct children of a directory node, 0 for a file.
    pub fn child_ct(&self) -> usize {
        self.children().map_or(0, |c| c.len())
    }

    /// Append a child node in insertion order. Appending to a file node is
    /// a caller bug.
    pub fn add_child(&mut self, node: FileTreeNode) {
        match self {
            FileTreeNode::Directory { children, .. } => children.push(node),
            FileTreeNode::File(_) => panic!("cannot add a child to a file node"),
        }
    }

    /// Walk the directory path given by `components`, creating any missing
    /// component with empty metadata. Name matching is case-insensitive.
    /// Returns the final directory node.
    pub(crate) fn ensure_dir_path(&mut self, components: &[&str]) -> Result<&mut FileTreeNode, FileSystemError> {
        self.walk_dir_path(components, true)
    }

    /// Walk the directory path given by `components`, failing with
    /// [FileSystemError::PathNotFound] if any component does not already
    /// exist as a subdirectory.
    pub(crate) fn resolve_dir_path(&mut self, components: &[&str]) -> Result<&mut FileTreeNode, FileSystemError> {
        self.walk_dir_path(components, false)
    }

    fn walk_dir_path(&mut self, components: &[&str], create: bool) -> Result<&mut FileTreeNode, FileSystemError> {
        let Some((name, rest)) = components.split_first()
        else {
            return Ok(self);
        };

        let FileTreeNode::Directory { dfe, children } = self
        else {
            return Err(FileSystemError::PathNotFound(components.join("/")));
        };

        let found = children
            .iter()
            .position(|child| child.is_dir() && child.entry().short_name.eq_ignore_ascii_case(name));

        let index = match found {
            Some(index) => index,
            None if create => {
                let path = if dfe.path == "/" {
                    name.to_string()
                }
                else {
                    format!("{}/{}", dfe.path, name)
                };
                log::trace!("Creating directory node: {}", path);
                children.push(FileTreeNode::Directory {
                    dfe: FileEntry::new_directory(name.to_string(), path, None),
                    children: Vec::new(),
                });
                children.len() - 1
            }
            None => {
                return Err(FileSystemError::PathNotFound(format!("{}/{}", dfe.path, name)));
            }
        };

        children[index].walk_dir_path(rest, create)
    }

    /// Log the tree listing, directories first, the way it will be laid out
    /// on the image.
    pub fn dump(&self, path: &str) {
        if let FileTreeNode::Directory { children, .. } = self {
            log::debug!("[{}] ( {} entries )", path, children.len());
            for child in children {
                if let FileTreeNode::Directory { dfe, .. } = child {
                    child.dump(&format!("{}/{}", path, dfe.short_name));
                }
            }
            for child in children {
                if let FileTreeNode::File(entry) = child {
                    log::debug!("  {:>10} : {}", entry.size, entry.short_name);
                }
            }
        }
    }
}
