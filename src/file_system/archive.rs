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

    src/file_system/archive.rs

    Building a source tree from a ZIP archive.

    Members are visited in archive order. A member path ending in '/'
    announces a directory; its components are created on the walk from the
    root as needed. A file member requires every parent component to have
    been announced already, matching names case-insensitively.
*/

use std::io::Read;

use zip::ZipArchive;

use crate::{
    file_system::{FileEntry, FileSystemError, FileTreeNode, FsDateTime},
    io::ReadSeek,
};

/// Return true if the provided stream parses as a ZIP archive.
pub fn detect_zip<T: ReadSeek>(archive_io: &mut T) -> bool {
    ZipArchive::new(archive_io).is_ok()
}

pub fn build_file_tree<T: ReadSeek>(archive_io: T) -> Result<FileTreeNode, FileSystemError> {
    let mut zip = ZipArchive::new(archive_io)?;
    let mut root = FileTreeNode::new_root();

    for i in 0..zip.len() {
        let mut member = zip.by_index(i)?;

        let member_path = member.name().to_string();
        if member_path.is_empty() {
            continue;
        }

        let modified = member.last_modified().map(FsDateTime::from);

        if member_path.ends_with('/') {
            // New directory: create the complete path from the root.
            let components: Vec<&str> = member_path.split('/').filter(|c| !c.is_empty()).collect();
            root.ensure_dir_path(&components)?;
        }
        else {
            // Supposed to be a file; the last component is its name.
            let mut components: Vec<&str> = member_path.split('/').filter(|c| !c.is_empty()).collect();
            let file_name = components.pop().unwrap_or_default().to_string();
            let dir = root.resolve_dir_path(&components)?;

            // Sanity check the claimed size. Let's not zip-bomb ourselves.
            if member.size() > 100_000_000 {
                return Err(FileSystemError::ArchiveError(format!(
                    "Member {} too large ({} bytes)",
                    member_path,
                    member.size()
                )));
            }

            let mut data = Vec::with_capacity(member.size() as usize);
            member.read_to_end(&mut data)?;

            log::trace!("Adding archive member: {} ({} bytes)", member_path, data.len());
            dir.add_child(FileTreeNode::File(FileEntry::new_file(
                file_name,
                member_path,
                data,
                modified,
            )));
        }
    }

    Ok(root)
}
