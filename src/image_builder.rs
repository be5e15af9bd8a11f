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

//! A module to implement the builder pattern for a filled [RawImage].
//!
//! An [ImageBuilder] takes a file source — a host directory, a ZIP archive,
//! or a pre-built [FileTreeNode] — and produces the raw FAT12 floppy image,
//! ready for MSA serialization. The standard 10-sector geometry is tried
//! first; if the source does not fit, the build is retried exactly once
//! with the oversized 11-sector layout.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use crate::{
    fat12::Fat12Builder,
    file_system::{archive, native, FileTreeNode},
    geometry::FloppyGeometry,
    raw_image::RawImage,
    DiskImageError,
};

pub const DEFAULT_VOLUME_LABEL: &str = "LEONARD";

/// Implements the Builder pattern for filled [RawImage] objects.
pub struct ImageBuilder {
    /// The volume label written to the first root directory slot.
    pub volume_label: String,
    /// Override the initial geometry. The fallback behavior, if any, is the
    /// geometry's own.
    pub geometry: Option<FloppyGeometry>,
    /// Build the source tree from a host directory.
    /// Mutually exclusive with `from_archive` and `from_tree`.
    pub from_path: Option<PathBuf>,
    /// Build the source tree from a ZIP archive file.
    /// Mutually exclusive with `from_path` and `from_tree`.
    pub from_archive: Option<PathBuf>,
    /// Use an already-built source tree.
    /// Mutually exclusive with `from_path` and `from_archive`.
    pub from_tree: Option<FileTreeNode>,
}

impl Default for ImageBuilder {
    fn default() -> Self {
        ImageBuilder {
            volume_label: DEFAULT_VOLUME_LABEL.to_string(),
            geometry: None,
            from_path: None,
            from_archive: None,
            from_tree: None,
        }
    }
}

impl ImageBuilder {
    pub fn new() -> ImageBuilder {
        Default::default()
    }

    /// Set the volume label for the image to be built.
    pub fn with_volume_label(mut self, label: impl Into<String>) -> ImageBuilder {
        self.volume_label = label.into();
        self
    }

    /// Set the initial [FloppyGeometry] for the image to be built.
    pub fn with_geometry(mut self, geometry: FloppyGeometry) -> ImageBuilder {
        self.geometry = Some(geometry);
        self
    }

    /// Build the source tree from the files and subdirectories under `path`.
    pub fn with_tree_from_path(mut self, path: impl AsRef<Path>) -> ImageBuilder {
        self.from_path = Some(path.as_ref().to_path_buf());
        self.from_archive = None;
        self.from_tree = None;
        self
    }

    /// Build the source tree from the members of the ZIP archive at `path`.
    pub fn with_tree_from_archive(mut self, path: impl AsRef<Path>) -> ImageBuilder {
        self.from_archive = Some(path.as_ref().to_path_buf());
        self.from_path = None;
        self.from_tree = None;
        self
    }

    /// Use a source tree the caller built directly.
    pub fn with_tree(mut self, tree: FileTreeNode) -> ImageBuilder {
        self.from_tree = Some(tree);
        self.from_path = None;
        self.from_archive = None;
        self
    }

    /// Build the filled [RawImage] using the specified parameters.
    pub fn build(self) -> Result<RawImage, DiskImageError> {
        let tree = if let Some(tree) = self.from_tree {
            tree
        }
        else if let Some(path) = &self.from_path {
            log::debug!("build(): Building source tree from directory {}", path.display());
            native::build_file_tree(path)?
        }
        else if let Some(path) = &self.from_archive {
            log::debug!("build(): Building source tree from archive {}", path.display());
            let file = File::open(path).map_err(|e| DiskImageError::IoError(e.to_string()))?;
            archive::build_file_tree(BufReader::new(file))?
        }
        else {
            log::error!("build(): No file source set");
            return Err(DiskImageError::ParameterError("no file source set".to_string()));
        };

        tree.dump("");

        let geometry = self.geometry.unwrap_or_default();
        match Self::fill_image(geometry, &tree, &self.volume_label) {
            Err(DiskImageError::DiskFull) => {
                let fallback = geometry.fallback().ok_or(DiskImageError::DiskFull)?;
                log::info!(
                    "build(): Source does not fit on a {} disk, retrying with {}",
                    geometry,
                    fallback
                );
                Self::fill_image(fallback, &tree, &self.volume_label)
            }
            result => result,
        }
    }

    /// One build attempt at a fixed geometry: a fresh image, a fresh FAT,
    /// the tree placed, and both FAT copies flushed. On error the partial
    /// image is dropped.
    fn fill_image(
        geometry: FloppyGeometry,
        tree: &FileTreeNode,
        volume_label: &str,
    ) -> Result<RawImage, DiskImageError> {
        let mut image = RawImage::create(geometry)?;
        let mut fat = Fat12Builder::new(&image, volume_label);
        fat.fill(&mut image, tree)?;
        fat.flush_fats(&mut image);
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{ATARI_ST_DS_10, ATARI_ST_DS_11};

    #[test]
    fn test_with_volume_label() {
        let builder = ImageBuilder::new().with_volume_label("OXYGENE");
        assert_eq!(builder.volume_label, "OXYGENE");
    }

    #[test]
    fn test_default_volume_label() {
        assert_eq!(ImageBuilder::new().volume_label, DEFAULT_VOLUME_LABEL);
    }

    #[test]
    fn test_with_geometry() {
        let builder = ImageBuilder::new().with_geometry(ATARI_ST_DS_11);
        assert_eq!(builder.geometry, Some(ATARI_ST_DS_11));
    }

    #[test]
    fn test_sources_are_mutually_exclusive() {
        let builder = ImageBuilder::new()
            .with_tree_from_path("somewhere")
            .with_tree_from_archive("archive.zip");
        assert!(builder.from_path.is_none());
        assert!(builder.from_archive.is_some());
    }

    #[test]
    fn test_build_requires_a_source() {
        assert!(matches!(
            ImageBuilder::new().build(),
            Err(DiskImageError::ParameterError(_))
        ));
    }

    #[test]
    fn test_build_empty_tree() {
        let image = ImageBuilder::new().with_tree(FileTreeNode::new_root()).build().unwrap();
        assert_eq!(image.geometry(), ATARI_ST_DS_10);
        assert_eq!(image.len(), ATARI_ST_DS_10.raw_size());
    }
}
