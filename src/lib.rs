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

//! MSAFox builds Atari ST MSA (Magic Shadow Archiver) floppy disk images
//! from a tree of files, sourced from a host directory or a ZIP archive.
//!
//! The produced image is a complete double-sided FAT12 floppy: boot sector,
//! two FAT copies, a fixed 112-entry root directory, and a data area holding
//! the files and subdirectories of the source tree. The raw image is then
//! serialized track-by-track into the RLE-compressed MSA container.

pub mod boot_sector;
pub mod fat12;
pub mod file_system;
pub mod geometry;
pub mod image_builder;
pub mod io;
pub mod msa;
pub mod raw_image;

use std::hash::RandomState;

use thiserror::Error;

pub const SECTOR_SIZE: usize = 512;
pub const SECTORS_PER_CLUSTER: usize = 2;
pub const CLUSTER_SIZE: usize = SECTOR_SIZE * SECTORS_PER_CLUSTER;

/// Fill byte for unused disk area. The Atari convention for erased media,
/// also reused by the MSA container as its RLE escape byte.
pub const ERASED_FILL: u8 = 0xE5;

pub const MAX_ROOT_ENTRIES: usize = 112;
pub const SECTORS_PER_FAT: usize = 5;
pub const ROOT_DIR_SECTORS: usize = (MAX_ROOT_ENTRIES * 32) / SECTOR_SIZE;
pub const RESERVED_SECTORS: usize = 1;

/// First sector of the data area. Cluster 2 maps here; clusters 0 and 1 are
/// reserved FAT entries with no backing storage.
pub const DATA_START_SECTOR: usize = RESERVED_SECTORS + 2 * SECTORS_PER_FAT + ROOT_DIR_SECTORS;

#[allow(unused)]
pub(crate) type FoxHashMap<K, V, S = RandomState> = std::collections::HashMap<K, V, S>;
#[allow(unused)]
pub(crate) type FoxHashSet<T, S = RandomState> = std::collections::HashSet<T, S>;

#[derive(Debug, Error)]
pub enum DiskImageError {
    #[error("An IO error occurred reading or writing the disk image: {0}")]
    IoError(String),
    #[error("Too many entries in the root directory ({got} entries + volume label > {max})")]
    RootDirectoryFull { got: usize, max: usize },
    #[error("No more free clusters on the disk")]
    DiskFull,
    #[error("An invalid parameter was supplied: {0}")]
    ParameterError(String),
    #[error("A filesystem error occurred: {0}")]
    FileSystem(#[from] file_system::FileSystemError),
}

impl From<crate::io::Error> for DiskImageError {
    fn from(e: crate::io::Error) -> Self {
        DiskImageError::IoError(e.to_string())
    }
}

impl From<binrw::Error> for DiskImageError {
    fn from(e: binrw::Error) -> Self {
        DiskImageError::IoError(e.to_string())
    }
}

pub use crate::{
    file_system::{FileEntry, FileTreeNode, FsDateTime},
    geometry::FloppyGeometry,
    image_builder::ImageBuilder,
    msa::MsaFormat,
    raw_image::RawImage,
};
