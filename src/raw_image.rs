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

    src/raw_image.rs

    The flat, geometry-determined sector image the FAT12 builder writes
    into and the MSA codec reads from. Created 0xE5-filled with a valid
    boot sector; everything past sector 0 stays erased fill until the
    builder overwrites it.
*/

use crate::{
    boot_sector,
    geometry::FloppyGeometry,
    DiskImageError,
    CLUSTER_SIZE,
    DATA_START_SECTOR,
    ERASED_FILL,
    SECTOR_SIZE,
};

pub struct RawImage {
    geometry: FloppyGeometry,
    data: Vec<u8>,
}

impl RawImage {
    /// Allocate an image of the given geometry, fill it with the erased
    /// byte, and write the boot sector.
    pub fn create(geometry: FloppyGeometry) -> Result<RawImage, DiskImageError> {
        let mut data = vec![ERASED_FILL; geometry.raw_size()];
        boot_sector::write_boot_sector(&mut data[..SECTOR_SIZE], geometry)?;

        log::debug!(
            "RawImage::create(): {} image, {} bytes, {} data sectors",
            geometry,
            data.len(),
            geometry.data_sectors()
        );

        Ok(RawImage { geometry, data })
    }

    pub fn geometry(&self) -> FloppyGeometry {
        self.geometry
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Number of sectors in the data area.
    pub fn data_sectors(&self) -> usize {
        self.geometry.data_sectors()
    }

    pub fn write_u8(&mut self, offset: usize, value: u8) {
        self.data[offset] = value;
    }

    pub fn write_u16_le(&mut self, offset: usize, value: u16) {
        self.data[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    /// Mutable view of an arbitrary byte region of the image.
    pub fn slice_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }

    /// Mutable view of `cluster_ct` contiguous clusters starting at
    /// `start_cluster`. Clusters 0 and 1 are reserved FAT entries with no
    /// backing storage; asking for them is a caller bug.
    pub fn cluster_mut(&mut self, start_cluster: u16, cluster_ct: usize) -> &mut [u8] {
        assert!(start_cluster >= 2, "clusters below 2 have no data area backing");
        let offset = Self::cluster_offset(start_cluster);
        &mut self.data[offset..offset + cluster_ct * CLUSTER_SIZE]
    }

    /// Byte offset of a data cluster within the raw image.
    pub fn cluster_offset(cluster: u16) -> usize {
        DATA_START_SECTOR * SECTOR_SIZE + (cluster as usize - 2) * CLUSTER_SIZE
    }

    /// Read-only view of one track's worth of contiguous sectors, sides
    /// interleaved, as the MSA codec consumes them.
    pub fn track(&self, index: usize) -> &[u8] {
        let track_size = self.geometry.track_size();
        &self.data[index * track_size..(index + 1) * track_size]
    }
}
