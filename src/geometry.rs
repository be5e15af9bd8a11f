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

    src/geometry.rs

    Physical disk geometry for the double-sided Atari ST layouts emitted by
    the image builder. The builder first attempts the standard 10-sector
    layout and falls back once to the oversized 11-sector layout when the
    source tree does not fit.
*/

use std::fmt::{Display, Formatter};

use crate::{DATA_START_SECTOR, SECTOR_SIZE};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FloppyGeometry {
    pub sides: u16,
    pub sectors_per_track: u16,
    pub cylinders: u16,
}

/// Standard double-sided Atari ST layout, 828 KiB raw.
pub const ATARI_ST_DS_10: FloppyGeometry = FloppyGeometry {
    sides: 2,
    sectors_per_track: 10,
    cylinders: 81,
};

/// Oversized fallback layout, 891 KiB raw.
pub const ATARI_ST_DS_11: FloppyGeometry = FloppyGeometry {
    sides: 2,
    sectors_per_track: 11,
    cylinders: 81,
};

impl Default for FloppyGeometry {
    fn default() -> Self {
        ATARI_ST_DS_10
    }
}

impl Display for FloppyGeometry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}x{}", self.sides, self.sectors_per_track, self.cylinders)
    }
}

impl FloppyGeometry {
    pub fn total_sectors(&self) -> usize {
        self.sides as usize * self.sectors_per_track as usize * self.cylinders as usize
    }

    /// Size of the raw sector image in bytes.
    pub fn raw_size(&self) -> usize {
        self.total_sectors() * SECTOR_SIZE
    }

    /// Size of one track in bytes.
    pub fn track_size(&self) -> usize {
        self.sectors_per_track as usize * SECTOR_SIZE
    }

    /// Number of tracks on the disk, sides interleaved.
    pub fn track_ct(&self) -> usize {
        self.cylinders as usize * self.sides as usize
    }

    /// Number of sectors available to the data area, past the boot sector,
    /// both FAT copies and the root directory.
    pub fn data_sectors(&self) -> usize {
        self.total_sectors().saturating_sub(DATA_START_SECTOR)
    }

    /// The geometry to retry with when filling this one overflows, if any.
    /// Only the standard 10-sector layout has a fallback; the retry is not
    /// repeated.
    pub fn fallback(&self) -> Option<FloppyGeometry> {
        (*self == ATARI_ST_DS_10).then_some(ATARI_ST_DS_11)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atari_layouts() {
        assert_eq!(ATARI_ST_DS_10.total_sectors(), 1620);
        assert_eq!(ATARI_ST_DS_10.raw_size(), 828 * 1024);
        assert_eq!(ATARI_ST_DS_10.track_size(), 5120);
        assert_eq!(ATARI_ST_DS_10.track_ct(), 162);
        assert_eq!(ATARI_ST_DS_11.raw_size(), 891 * 1024);
    }

    #[test]
    fn test_fallback_is_single() {
        let fallback = ATARI_ST_DS_10.fallback().unwrap();
        assert_eq!(fallback, ATARI_ST_DS_11);
        assert!(fallback.fallback().is_none());
    }
}
