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

    src/file_system/date_time.rs

    Calendar timestamps for source tree entries and their packing into the
    two 16-bit DOS date/time fields of a directory record.
*/

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    time::SystemTime,
};

use chrono::{DateTime, Datelike, Local, Timelike};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FsDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl Default for FsDateTime {
    fn default() -> Self {
        Self {
            year: 1980,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
        }
    }
}

impl Display for FsDateTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{:04}/{:02}/{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

impl FsDateTime {
    /// Pack into the DOS `(date, time)` directory record fields.
    ///
    /// Date: bits 15-9 year from 1980, bits 8-5 month, bits 4-0 day.
    /// Time: bits 15-11 hour, bits 10-5 minute, bits 4-0 seconds/2.
    /// Years outside the representable 1980..=2107 range are clamped.
    pub fn to_dos(&self) -> (u16, u16) {
        let year = match self.year {
            y if y < 1980 => 0,
            y if y > 2107 => 127,
            y => y - 1980,
        };

        let date = (year << 9) | ((self.month as u16) << 5) | (self.day as u16);
        let time = ((self.hour as u16) << 11) | ((self.minute as u16) << 5) | ((self.second as u16) / 2);
        (date, time)
    }
}

impl From<SystemTime> for FsDateTime {
    fn from(st: SystemTime) -> Self {
        // DOS timestamps are wall-clock local time.
        let dt: DateTime<Local> = st.into();
        Self {
            year: dt.year().clamp(0, u16::MAX as i32) as u16,
            month: dt.month() as u8,
            day: dt.day() as u8,
            hour: dt.hour() as u8,
            minute: dt.minute() as u8,
            second: dt.second() as u8,
        }
    }
}

impl From<zip::DateTime> for FsDateTime {
    fn from(dt: zip::DateTime) -> Self {
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
        }
    }
}
