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

    tests/msa.rs

    MSA container round trips: header fields, track framing, and the RLE
    invertibility law.
*/
mod common;

use common::*;
use msafox::{geometry::ATARI_ST_DS_10, msa::encode_track, ImageBuilder, RawImage};

#[test]
fn test_header_fields() {
    init();

    let image = RawImage::create(ATARI_ST_DS_10).unwrap();
    let msa = encode_msa(&image);

    let decoded = decode_msa(&msa);
    assert_eq!(decoded.sectors_per_track, 10);
    assert_eq!(decoded.sides, 1);
    assert_eq!(decoded.start_track, 0);
    assert_eq!(decoded.end_track, 80);

    // Signature bytes on the wire, big-endian.
    assert_eq!(&msa[0..2], &[0x0E, 0x0F]);
}

#[test]
fn test_empty_image_round_trip() {
    init();

    let image = RawImage::create(ATARI_ST_DS_10).unwrap();
    let msa = encode_msa(&image);
    let decoded = decode_msa(&msa);

    assert_eq!(decoded.data, image.data());

    // An erased image compresses to a small fraction of its raw size.
    assert!(msa.len() < image.len() / 100);
}

#[test]
fn test_built_image_round_trip() {
    init();

    let payload: Vec<u8> = (0..100_000u32).map(|i| (i * 7 % 256) as u8).collect();
    let tree = root_node(vec![
        file_node("NOISE.BIN", &payload),
        dir_node("SUB", vec![file_node("SMALL.TXT", b"hello atari")]),
    ]);
    let image = ImageBuilder::new().with_tree(tree).build().unwrap();

    let decoded = decode_msa(&encode_msa(&image));
    assert_eq!(decoded.data, image.data());
}

#[test]
fn test_incompressible_track_uses_raw_framing() {
    init();

    let mut image = RawImage::create(ATARI_ST_DS_10).unwrap();

    // A pattern with no runs and no escape bytes encodes to itself, so the
    // writer must fall back to the raw frame.
    let track_size = ATARI_ST_DS_10.track_size();
    let pattern: Vec<u8> = (0..track_size).map(|i| (i % 5) as u8 + 1).collect();
    assert_eq!(encode_track(&pattern), pattern);

    image.slice_mut(3 * track_size, track_size).copy_from_slice(&pattern);

    let msa = encode_msa(&image);
    let decoded = decode_msa(&msa);
    assert_eq!(decoded.data, image.data());
}

#[test]
fn test_single_escape_byte_law() {
    // A lone 0xE5 is escaped regardless of run length, and the decoder
    // restores exactly one byte.
    let encoded = encode_track(&[0xE5]);
    assert_eq!(encoded, vec![0xE5, 0xE5, 0x00, 0x01]);
}

#[test]
fn test_worked_frame_example() {
    // 100 zeroes then 5020 erased bytes: two escape sequences, framed with
    // a big-endian length of 8.
    let mut track = vec![0x00u8; 100];
    track.extend_from_slice(&[0xE5; 5020]);

    let encoded = encode_track(&track);
    assert_eq!(encoded, vec![0xE5, 0x00, 0x00, 0x64, 0xE5, 0xE5, 0x13, 0x9C]);

    let mut framed = vec![0x00, 0x08];
    framed.extend_from_slice(&encoded);
    assert_eq!(framed, vec![0x00, 0x08, 0xE5, 0x00, 0x00, 0x64, 0xE5, 0xE5, 0x13, 0x9C]);
}
