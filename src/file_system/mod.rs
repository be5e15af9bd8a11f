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

//! The source tree model and the two producers that populate it: the host
//! directory walker and the ZIP archive walker.

use thiserror::Error;

pub mod archive;
pub mod date_time;
pub mod file_tree;
pub mod native;

pub use date_time::FsDateTime;
pub use file_tree::{FileEntry, FileEntryType, FileTreeNode};

/// [FileSystemError] is the error type for source tree construction.
#[derive(Clone, Debug, Error)]
pub enum FileSystemError {
    #[error("An IO error occurred building the source tree: {0}")]
    IoError(String),
    #[error("Could not load \"{0}\"")]
    ReadError(String),
    #[error("An archive error occurred: {0}")]
    ArchiveError(String),
    #[error("The requested path was not found: {0}")]
    PathNotFound(String),
    #[error("A cycle was detected in the file system. Cyclical symlinks are not supported.")]
    CycleError,
    #[error("A filesystem object was detected that was not a file or directory: {0}")]
    UnsupportedFileObject(String),
}

impl From<crate::io::Error> for FileSystemError {
    fn from(e: crate::io::Error) -> Self {
        FileSystemError::IoError(e.to_string())
    }
}

impl From<zip::result::ZipError> for FileSystemError {
    fn from(e: zip::result::ZipError) -> Self {
        FileSystemError::ArchiveError(e.to_string())
    }
}
