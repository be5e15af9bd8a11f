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

    src/msa.rs

    A writer for the Atari ST MSA (Magic Shadow Archiver) disk image format.

    An MSA file is a 10-byte big-endian header followed by one frame per
    track. Each frame is a 16-bit length and either the RLE-compressed track
    or, when compression would not help, the raw track verbatim. The RLE
    escape byte 0xE5 doubles as the erased-media fill, so single 0xE5 bytes
    must always be escaped.
*/

use binrw::{binrw, BinWrite};

use crate::{io::WriteSeek, raw_image::RawImage, DiskImageError};

pub const MSA_SIGNATURE: u16 = 0x0E0F;

/// The RLE escape byte. Any run longer than the 4-byte escape sequence is
/// worth encoding; a run of 0xE5 is escaped regardless of length.
pub const RLE_ESCAPE: u8 = 0xE5;

#[derive(Debug)]
#[binrw]
#[brw(big)]
pub struct MsaHeader {
    pub id: u16,
    pub sectors_per_track: u16,
    /// Number of sides minus one.
    pub sides: u16,
    pub start_track: u16,
    pub end_track: u16,
}

pub struct MsaFormat;

impl MsaFormat {
    pub fn extensions() -> Vec<&'static str> {
        vec!["msa"]
    }

    /// Serialize the raw image into the MSA container. Tracks are written
    /// in raw image order (sides interleaved), strictly forward; the output
    /// stream is never rewound.
    pub fn save_image<W: WriteSeek>(image: &RawImage, output: &mut W) -> Result<(), DiskImageError> {
        let geometry = image.geometry();

        let header = MsaHeader {
            id: MSA_SIGNATURE,
            sectors_per_track: geometry.sectors_per_track,
            sides: geometry.sides - 1,
            start_track: 0,
            end_track: geometry.cylinders - 1,
        };
        header.write(output)?;

        for track_idx in 0..geometry.track_ct() {
            let track = image.track(track_idx);
            let encoded = encode_track(track);

            // Keep the packed track only if packing was effective.
            if encoded.len() < track.len() {
                output.write_all(&(encoded.len() as u16).to_be_bytes())?;
                output.write_all(&encoded)?;
            }
            else {
                output.write_all(&(track.len() as u16).to_be_bytes())?;
                output.write_all(track)?;
            }
        }

        log::debug!(
            "MsaFormat::save_image(): Wrote {} tracks of geometry {}",
            geometry.track_ct(),
            geometry
        );
        Ok(())
    }
}

/// RLE-encode one track. Runs longer than the escape sequence itself, and
/// every run of the escape byte, become `[0xE5, value, count_hi, count_lo]`;
/// everything else passes through literally.
pub fn encode_track(track: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(track.len());

    let mut pos = 0;
    while pos < track.len() {
        let value = track[pos];
        let run = track[pos..].iter().take_while(|&&b| b == value).count();

        if run > 4 || value == RLE_ESCAPE {
            encoded.push(RLE_ESCAPE);
            encoded.push(value);
            encoded.extend_from_slice(&(run as u16).to_be_bytes());
            pos += run;
        }
        else {
            encoded.push(value);
            pos += 1;
        }
    }

    encoded
}
