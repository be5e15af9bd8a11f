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

    src/boot_sector.rs

    Routines for writing the boot sector and its BIOS Parameter Block.

    The BPB encodes the diskette geometry and filesystem layout for the
    Atari ST boot ROM (and any standard FAT12 reader). The sector also
    carries two Atari conventions: the 0xE9 branch opcode at offset 0, and
    a 0x4E fill over the serial number and loader region.
*/

use binrw::{binrw, BinWrite};

use crate::{
    geometry::FloppyGeometry,
    io::Cursor,
    DiskImageError,
    MAX_ROOT_ENTRIES,
    RESERVED_SECTORS,
    SECTORS_PER_CLUSTER,
    SECTORS_PER_FAT,
    SECTOR_SIZE,
};

/// Offset of the BIOS Parameter Block in the boot sector.
pub const BPB_OFFSET: u64 = 0x0B;

/// Media descriptor for a double-sided Atari ST diskette.
pub const MEDIA_DESCRIPTOR: u8 = 0xF7;

/// 8086 branch opcode expected by the Atari TOS boot ROM at offset 0.
pub const BOOT_BRANCH_OPCODE: u8 = 0xE9;

/// Fill byte for the serial number and loader stub region, 0x1E..0x3C.
pub const SERIAL_FILL: u8 = 0x4E;
pub const SERIAL_FILL_START: usize = 0x1E;
pub const SERIAL_FILL_LEN: usize = 30;

#[derive(Debug, Default)]
#[binrw]
#[brw(little)]
pub(crate) struct BiosParameterBlock {
    pub(crate) bytes_per_sector: u16,
    pub(crate) sectors_per_cluster: u8,
    pub(crate) reserved_sectors: u16,
    pub(crate) number_of_fats: u8,
    pub(crate) root_entries: u16,
    pub(crate) total_sectors: u16,
    pub(crate) media_descriptor: u8,
    pub(crate) sectors_per_fat: u16,
    pub(crate) sectors_per_track: u16,
    pub(crate) number_of_heads: u16,
    pub(crate) hidden_sectors: u16,
}

impl From<FloppyGeometry> for BiosParameterBlock {
    fn from(geometry: FloppyGeometry) -> Self {
        BiosParameterBlock {
            bytes_per_sector: SECTOR_SIZE as u16,
            sectors_per_cluster: SECTORS_PER_CLUSTER as u8,
            reserved_sectors: RESERVED_SECTORS as u16,
            number_of_fats: 2,
            root_entries: MAX_ROOT_ENTRIES as u16,
            total_sectors: geometry.total_sectors() as u16,
            media_descriptor: MEDIA_DESCRIPTOR,
            sectors_per_fat: SECTORS_PER_FAT as u16,
            sectors_per_track: geometry.sectors_per_track,
            number_of_heads: geometry.sides,
            hidden_sectors: 0,
        }
    }
}

/// Write a boot sector for the given geometry into `sector`, which must be
/// exactly one sector long. Bytes not covered by the branch opcode, the BPB
/// or the serial fill are zeroed.
pub(crate) fn write_boot_sector(sector: &mut [u8], geometry: FloppyGeometry) -> Result<(), DiskImageError> {
    assert_eq!(sector.len(), SECTOR_SIZE);

    sector.fill(0);
    sector[0] = BOOT_BRANCH_OPCODE;

    let bpb = BiosParameterBlock::from(geometry);
    let mut cursor = Cursor::new(&mut *sector);
    cursor.set_position(BPB_OFFSET);
    bpb.write(&mut cursor)?;

    sector[SERIAL_FILL_START..SERIAL_FILL_START + SERIAL_FILL_LEN].fill(SERIAL_FILL);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ATARI_ST_DS_10;

    #[test]
    fn test_boot_sector_layout() {
        let mut sector = vec![0xAAu8; SECTOR_SIZE];
        write_boot_sector(&mut sector, ATARI_ST_DS_10).unwrap();

        assert_eq!(sector[0x00], 0xE9);
        assert_eq!(&sector[0x0B..0x0D], &512u16.to_le_bytes());
        assert_eq!(sector[0x0D], 2);
        assert_eq!(&sector[0x0E..0x10], &1u16.to_le_bytes());
        assert_eq!(sector[0x10], 2);
        assert_eq!(&sector[0x11..0x13], &112u16.to_le_bytes());
        assert_eq!(&sector[0x13..0x15], &1620u16.to_le_bytes());
        assert_eq!(sector[0x15], 0xF7);
        assert_eq!(&sector[0x16..0x18], &5u16.to_le_bytes());
        assert_eq!(&sector[0x18..0x1A], &10u16.to_le_bytes());
        assert_eq!(&sector[0x1A..0x1C], &2u16.to_le_bytes());
        assert_eq!(&sector[0x1C..0x1E], &0u16.to_le_bytes());
        assert!(sector[0x1E..0x3C].iter().all(|&b| b == 0x4E));
        // Everything else is zeroed, including the old fill.
        assert!(sector[0x01..0x0B].iter().all(|&b| b == 0));
        assert!(sector[0x3C..].iter().all(|&b| b == 0));
    }
}
