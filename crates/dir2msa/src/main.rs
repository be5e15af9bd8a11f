/*
    dir2msa
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

    crates/dir2msa/src/main.rs

    Command line front end: make an Atari ST MSA floppy disk image from a
    ZIP file archive or a host directory.
*/

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{anyhow, bail, Context, Error};
use bpaf::{construct, positional, OptionParser, Parser};
use msafox::{file_system::archive, ImageBuilder, MsaFormat};

#[derive(Debug, Clone)]
struct Params {
    path: PathBuf,
}

/// Set up bpaf argument parsing.
fn opts() -> OptionParser<Params> {
    let path = positional::<PathBuf>("PATH").help("Directory or ZIP archive to pack into the image");

    construct!(Params { path })
        .to_options()
        .descr("dir2msa: make an Atari ST MSA floppy disk image from a ZIP archive or a directory")
}

fn main() {
    env_logger::init();

    println!(
        "dir2msa v{}\nMake an Atari MSA floppy disk image from\na ZIP file archive or a host directory.\n",
        env!("CARGO_PKG_VERSION")
    );

    let params = opts().run();

    match run(&params) {
        Ok(()) => {}
        Err(e) => {
            // Single-line diagnostic; keep it on stdout with the progress output.
            println!("ERROR: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(params: &Params) -> Result<(), Error> {
    let metadata = fs::metadata(&params.path).map_err(|_| anyhow!("\"{}\" is not a valid path", params.path.display()))?;

    let (builder, out_path) = if metadata.is_dir() {
        println!("Parsing directory tree...");

        // For a directory input, the image lands next to it: <path>.msa
        let mut out_path = params.path.clone().into_os_string();
        out_path.push(".msa");

        (
            ImageBuilder::new().with_tree_from_path(&params.path),
            PathBuf::from(out_path),
        )
    }
    else {
        // Maybe it's a ZIP file.
        let file = File::open(&params.path).with_context(|| format!("opening \"{}\"", params.path.display()))?;
        let mut reader = BufReader::new(file);
        if !archive::detect_zip(&mut reader) {
            bail!("\"{}\" is not a directory, or not a ZIP file", params.path.display());
        }

        println!("Parsing ZIP archive file...");

        (
            ImageBuilder::new().with_tree_from_archive(&params.path),
            params.path.with_extension("msa"),
        )
    };

    let image = builder.build()?;
    log::debug!("Built {} raw image of {} bytes", image.geometry(), image.len());

    println!("Writing file \"{}\"", out_path.display());
    let out_file = File::create(&out_path).with_context(|| format!("creating \"{}\"", out_path.display()))?;
    let mut writer = BufWriter::new(out_file);
    MsaFormat::save_image(&image, &mut writer)?;
    writer.flush()?;

    Ok(())
}
