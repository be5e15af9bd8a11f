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

    src/fat12.rs

    The FAT12 layout engine. Serializes a source tree into the raw image:
    allocates cluster chains, materializes 8.3 directory records for the
    root and every subdirectory, copies file payloads into the data area,
    and finally packs the allocation table into both on-disk FAT copies.

    Cluster allocation is strictly sequential; nothing is ever freed, so a
    chain is always a contiguous ascending run. Entries 0 and 1 of the FAT
    are reserved and hold the media byte marker.
*/

use binrw::{binrw, BinWrite};

use crate::{
    file_system::{FileEntry, FileTreeNode, FsDateTime},
    io::Cursor,
    raw_image::RawImage,
    DiskImageError,
    CLUSTER_SIZE,
    MAX_ROOT_ENTRIES,
    RESERVED_SECTORS,
    ROOT_DIR_SECTORS,
    SECTORS_PER_CLUSTER,
    SECTORS_PER_FAT,
    SECTOR_SIZE,
};

pub const DIR_RECORD_SIZE: usize = 32;

pub const ATTR_VOLUME_LABEL: u8 = 0x08;
pub const ATTR_DIRECTORY: u8 = 0x10;

/// End-of-chain marker as stored in a 12-bit FAT entry.
pub const END_OF_CHAIN: u16 = 0xFFF;

/// A 32-byte short-name directory record.
#[derive(Debug, Default)]
#[binrw]
#[brw(little)]
pub struct DirRecord {
    pub name: [u8; 8],
    pub ext: [u8; 3],
    pub attributes: u8,
    pub reserved: [u8; 10],
    pub update_time: u16,
    pub update_date: u16,
    pub first_cluster: u16,
    pub file_size: u32,
}

impl DirRecord {
    pub(crate) fn from_entry(entry: &FileEntry, attributes: u8, first_cluster: u16) -> DirRecord {
        let (name, ext) = short_name(entry.short_name());
        let (update_date, update_time) = entry.modified().map(FsDateTime::to_dos).unwrap_or((0, 0));
        DirRecord {
            name,
            ext,
            attributes,
            reserved: [0; 10],
            update_time,
            update_date,
            first_cluster,
            file_size: if entry.is_file() { entry.size() as u32 } else { 0 },
        }
    }

    pub(crate) fn volume_label(label: &str) -> DirRecord {
        let mut name = [0u8; 8];
        pack_name_field(&mut name, label);
        DirRecord {
            name,
            ext: [b' '; 3],
            attributes: ATTR_VOLUME_LABEL,
            ..DirRecord::default()
        }
    }

    /// The reserved "." / ".." records at the head of every subdirectory.
    fn dot_entry(dots: usize, first_cluster: u16) -> DirRecord {
        let mut name = [b' '; 8];
        name[..dots].fill(b'.');
        DirRecord {
            name,
            ext: [b' '; 3],
            attributes: ATTR_DIRECTORY,
            first_cluster,
            ..DirRecord::default()
        }
    }
}

/// Derive the 8.3 name fields from an entry's display name: split at the
/// last dot, uppercase both halves, truncate and space-pad. No validation
/// and no collision detection; colliding short forms are the producer's
/// problem.
pub(crate) fn short_name(display: &str) -> ([u8; 8], [u8; 3]) {
    let (stem, extension) = match display.rsplit_once('.') {
        Some((stem, extension)) => (stem, extension),
        None => (display, ""),
    };

    let mut name = [0u8; 8];
    let mut ext = [0u8; 3];
    pack_name_field(&mut name, stem);
    pack_name_field(&mut ext, extension);
    (name, ext)
}

/// Copy `src` into `dst` uppercased, stopping early at a dot, and padding
/// the remainder with spaces.
fn pack_name_field(dst: &mut [u8], src: &str) {
    let mut src = src.bytes();
    let mut terminated = false;
    for slot in dst.iter_mut() {
        match (!terminated).then(|| src.next()).flatten() {
            Some(b'.') | None => {
                terminated = true;
                *slot = b' ';
            }
            Some(b) => *slot = b.to_ascii_uppercase(),
        }
    }
}

/// Cluster allocation state for one image. Created fresh per build attempt
/// and flushed into the raw image's FAT regions once the tree is placed.
pub struct Fat12Builder {
    /// Per-cluster successor: 0 = free, N = next in chain, 0xFFF = end.
    fat: Vec<u16>,
    next_cluster: u16,
    free_clusters: usize,
    volume_label: String,
}

impl Fat12Builder {
    pub fn new(image: &RawImage, volume_label: &str) -> Fat12Builder {
        let max_fat_entry = image.data_sectors() / SECTORS_PER_CLUSTER;
        Fat12Builder {
            fat: vec![0; max_fat_entry],
            next_cluster: 2,
            free_clusters: max_fat_entry,
            volume_label: volume_label.to_string(),
        }
    }

    pub fn free_clusters(&self) -> usize {
        self.free_clusters
    }

    pub fn max_fat_entry(&self) -> usize {
        self.fat.len()
    }

    /// Serialize the root directory and, recursively, every subdirectory
    /// and file of the source tree into the raw image.
    pub fn fill(&mut self, image: &mut RawImage, root: &FileTreeNode) -> Result<(), DiskImageError> {
        let children = root
            .children()
            .ok_or_else(|| DiskImageError::ParameterError("source tree root must be a directory".to_string()))?;

        // One root slot is reserved for the volume label.
        if children.len() + 1 > MAX_ROOT_ENTRIES {
            log::error!(
                "fill(): Too many files in root directory ({} > {})",
                children.len(),
                MAX_ROOT_ENTRIES
            );
            return Err(DiskImageError::RootDirectoryFull {
                got: children.len(),
                max: MAX_ROOT_ENTRIES,
            });
        }

        // The root directory lives in reserved space after the boot sector
        // and the two FATs; it is not cluster-backed.
        let root_offset = (RESERVED_SECTORS + 2 * SECTORS_PER_FAT) * SECTOR_SIZE;
        self.build_directory(image, root_offset, ROOT_DIR_SECTORS * SECTOR_SIZE, children, 0, 0, 0)?;

        log::debug!("fill(): Free data clusters: {}", self.free_clusters);
        Ok(())
    }

    fn build_directory(
        &mut self,
        image: &mut RawImage,
        region_offset: usize,
        region_len: usize,
        entries: &[FileTreeNode],
        this_cluster: u16,
        parent_cluster: u16,
        depth: usize,
    ) -> Result<(), DiskImageError> {
        image.slice_mut(region_offset, region_len).fill(0);

        let mut record_offset = region_offset;

        if this_cluster == 0 {
            // Root directory: the first slot holds the volume label.
            write_record(image, record_offset, &DirRecord::volume_label(&self.volume_label))?;
            record_offset += DIR_RECORD_SIZE;
        }
        else {
            write_record(image, record_offset, &DirRecord::dot_entry(1, this_cluster))?;
            record_offset += DIR_RECORD_SIZE;
            write_record(image, record_offset, &DirRecord::dot_entry(2, parent_cluster))?;
            record_offset += DIR_RECORD_SIZE;
        }

        for node in entries {
            match node {
                FileTreeNode::Directory { dfe, children } => {
                    log::debug!("{}[{}]", "  ".repeat(depth), dfe.short_name());

                    // Two extra records for "." and "..".
                    let required = ((children.len() + 2) * DIR_RECORD_SIZE).div_ceil(CLUSTER_SIZE);
                    let start = self.reserve_chain(required)?;

                    write_record(image, record_offset, &DirRecord::from_entry(dfe, ATTR_DIRECTORY, start))?;
                    self.build_directory(
                        image,
                        RawImage::cluster_offset(start),
                        required * CLUSTER_SIZE,
                        children,
                        start,
                        this_cluster,
                        depth + 1,
                    )?;
                }
                FileTreeNode::File(entry) => {
                    log::debug!("{}{}", "  ".repeat(depth), entry.short_name());

                    let size = entry.size() as usize;
                    let required = size.div_ceil(CLUSTER_SIZE);

                    // A zero-byte file records cluster 0 and allocates nothing.
                    let start = if required > 0 {
                        let start = self.reserve_chain(required)?;
                        image.cluster_mut(start, required)[..size].copy_from_slice(entry.data());
                        start
                    }
                    else {
                        0
                    };

                    write_record(image, record_offset, &DirRecord::from_entry(entry, 0, start))?;
                }
            }
            record_offset += DIR_RECORD_SIZE;
        }

        Ok(())
    }

    /// Reserve `cluster_ct` contiguous clusters, link them in the FAT and
    /// mark the last as end-of-chain. Returns the first cluster.
    fn reserve_chain(&mut self, cluster_ct: usize) -> Result<u16, DiskImageError> {
        let start = self.next_cluster as usize;

        if cluster_ct > self.free_clusters || start + cluster_ct > self.fat.len() {
            log::error!(
                "reserve_chain(): No more space on the disk ({} clusters requested, {} free)",
                cluster_ct,
                self.free_clusters
            );
            return Err(DiskImageError::DiskFull);
        }

        for i in 0..cluster_ct - 1 {
            self.fat[start + i] = (start + i + 1) as u16;
        }
        self.fat[start + cluster_ct - 1] = END_OF_CHAIN;

        self.next_cluster += cluster_ct as u16;
        self.free_clusters -= cluster_ct;
        Ok(start as u16)
    }

    /// Pack the allocation table into the 12-bit on-disk representation and
    /// write both FAT copies. Entries 0 and 1 carry the media byte marker.
    pub fn flush_fats(&self, image: &mut RawImage) {
        let fat_len = SECTORS_PER_FAT * SECTOR_SIZE;
        let fats = image.slice_mut(RESERVED_SECTORS * SECTOR_SIZE, 2 * fat_len);
        let (first, second) = fats.split_at_mut(fat_len);

        first.fill(0);
        first[0] = 0xF7;
        first[1] = 0xFF;
        first[2] = 0xFF;

        // Two 12-bit entries pack into three bytes. The 5-sector FAT has
        // room for 1706 entries, far more than either geometry produces.
        let mut p = 3;
        for pair in self.fat[2..].chunks(2) {
            let a = pair[0] & 0xFFF;
            let b = if pair.len() > 1 { pair[1] & 0xFFF } else { 0 };

            first[p] = (a & 0xFF) as u8;
            first[p + 1] = ((a >> 8) as u8) | (((b & 0xF) as u8) << 4);
            first[p + 2] = (b >> 4) as u8;
            p += 3;
        }

        second.copy_from_slice(first);
    }
}

fn write_record(image: &mut RawImage, offset: usize, record: &DirRecord) -> Result<(), DiskImageError> {
    let mut cursor = Cursor::new(image.slice_mut(offset, DIR_RECORD_SIZE));
    record.write(&mut cursor)?;
    Ok(())
}
