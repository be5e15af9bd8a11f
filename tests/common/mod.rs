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

    tests/common/mod.rs

    Common support routines for tests: source tree construction shorthand,
    an MSA decoder, and readers for the packed FAT and directory records of
    a raw image.
*/
#![allow(dead_code)]

use msafox::{
    io::Cursor,
    FileEntry,
    FileTreeNode,
    FsDateTime,
    MsaFormat,
    RawImage,
    DATA_START_SECTOR,
    RESERVED_SECTORS,
    SECTORS_PER_FAT,
    SECTOR_SIZE,
};

pub const FAT_OFFSET: usize = RESERVED_SECTORS * SECTOR_SIZE;
pub const FAT_BYTES: usize = SECTORS_PER_FAT * SECTOR_SIZE;
pub const ROOT_OFFSET: usize = (RESERVED_SECTORS + 2 * SECTORS_PER_FAT) * SECTOR_SIZE;
pub const DATA_OFFSET: usize = DATA_START_SECTOR * SECTOR_SIZE;

pub fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn file_node(name: &str, data: &[u8]) -> FileTreeNode {
    FileTreeNode::File(FileEntry::new_file(name.to_string(), name.to_string(), data.to_vec(), None))
}

pub fn dated_file_node(name: &str, data: &[u8], modified: FsDateTime) -> FileTreeNode {
    FileTreeNode::File(FileEntry::new_file(
        name.to_string(),
        name.to_string(),
        data.to_vec(),
        Some(modified),
    ))
}

pub fn dir_node(name: &str, children: Vec<FileTreeNode>) -> FileTreeNode {
    FileTreeNode::Directory {
        dfe: FileEntry::new_directory(name.to_string(), name.to_string(), None),
        children,
    }
}

pub fn root_node(children: Vec<FileTreeNode>) -> FileTreeNode {
    FileTreeNode::Directory {
        dfe: FileEntry::new_directory("/".to_string(), "/".to_string(), None),
        children,
    }
}

pub fn cluster_offset(cluster: u16) -> usize {
    DATA_OFFSET + (cluster as usize - 2) * 1024
}

pub fn encode_msa(image: &RawImage) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    MsaFormat::save_image(image, &mut cursor).unwrap();
    cursor.into_inner()
}

pub struct DecodedMsa {
    pub sectors_per_track: u16,
    pub sides: u16,
    pub start_track: u16,
    pub end_track: u16,
    pub data: Vec<u8>,
}

/// Decode an MSA byte stream back into the raw sector image: parse the
/// header, then each track frame, expanding RLE frames and passing raw
/// frames through.
pub fn decode_msa(bytes: &[u8]) -> DecodedMsa {
    let be16 = |i: usize| u16::from_be_bytes([bytes[i], bytes[i + 1]]);

    assert_eq!(be16(0), 0x0E0F, "bad MSA signature");
    let sectors_per_track = be16(2);
    let sides = be16(4);
    let start_track = be16(6);
    let end_track = be16(8);

    let track_size = sectors_per_track as usize * SECTOR_SIZE;
    let track_ct = (end_track - start_track + 1) as usize * (sides as usize + 1);

    let mut data = Vec::with_capacity(track_ct * track_size);
    let mut pos = 10;

    for track in 0..track_ct {
        let frame_len = be16(pos) as usize;
        pos += 2;

        if frame_len == track_size {
            // Uncompressed frame, copied verbatim.
            data.extend_from_slice(&bytes[pos..pos + frame_len]);
            pos += frame_len;
        }
        else {
            let frame_end = pos + frame_len;
            let mut expanded = Vec::with_capacity(track_size);
            while pos < frame_end {
                if bytes[pos] == 0xE5 {
                    let value = bytes[pos + 1];
                    let count = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
                    expanded.resize(expanded.len() + count, value);
                    pos += 4;
                }
                else {
                    expanded.push(bytes[pos]);
                    pos += 1;
                }
            }
            assert_eq!(pos, frame_end, "RLE frame overran its length for track {}", track);
            assert_eq!(expanded.len(), track_size, "track {} expanded to the wrong size", track);
            data.extend_from_slice(&expanded);
        }
    }

    assert_eq!(pos, bytes.len(), "trailing bytes after the last track frame");

    DecodedMsa {
        sectors_per_track,
        sides,
        start_track,
        end_track,
        data,
    }
}

/// Read a 12-bit entry from the first FAT copy of a raw image.
pub fn fat_entry(image_data: &[u8], cluster: usize) -> u16 {
    let fat = &image_data[FAT_OFFSET..FAT_OFFSET + FAT_BYTES];
    let group = &fat[(cluster / 2) * 3..];
    if cluster % 2 == 0 {
        (group[0] as u16) | (((group[1] & 0x0F) as u16) << 8)
    }
    else {
        ((group[1] >> 4) as u16) | ((group[2] as u16) << 4)
    }
}

/// Walk a cluster chain from `start` to the end-of-chain marker.
pub fn chain(image_data: &[u8], start: u16) -> Vec<u16> {
    let mut clusters = vec![start];
    let mut cluster = start;
    loop {
        let next = fat_entry(image_data, cluster as usize);
        if next == 0xFFF {
            break;
        }
        assert_ne!(next, 0, "chain from cluster {} runs into a free entry", start);
        assert!(clusters.len() < 4096, "chain from cluster {} does not terminate", start);
        clusters.push(next);
        cluster = next;
    }
    clusters
}

pub struct RecordFields {
    pub name: [u8; 8],
    pub ext: [u8; 3],
    pub attributes: u8,
    pub update_time: u16,
    pub update_date: u16,
    pub first_cluster: u16,
    pub file_size: u32,
}

/// Read one 32-byte directory record from a directory region of the image.
pub fn read_record(image_data: &[u8], region_offset: usize, slot: usize) -> RecordFields {
    let r = &image_data[region_offset + slot * 32..region_offset + (slot + 1) * 32];
    RecordFields {
        name: r[0..8].try_into().unwrap(),
        ext: r[8..11].try_into().unwrap(),
        attributes: r[11],
        update_time: u16::from_le_bytes([r[22], r[23]]),
        update_date: u16::from_le_bytes([r[24], r[25]]),
        first_cluster: u16::from_le_bytes([r[26], r[27]]),
        file_size: u32::from_le_bytes([r[28], r[29], r[30], r[31]]),
    }
}

/// True if every byte of the record slot is zero.
pub fn record_is_empty(image_data: &[u8], region_offset: usize, slot: usize) -> bool {
    image_data[region_offset + slot * 32..region_offset + (slot + 1) * 32]
        .iter()
        .all(|&b| b == 0)
}
