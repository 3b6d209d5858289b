//! Test fixtures: small synthetic images and a scratch workspace.

use pixmap_art::codec::{self, EncodeOptions};
use rgb_pixmap::{Pixel, PixelBuffer};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Named colors used across tests
pub mod colors {
    use rgb_pixmap::Pixel;

    pub const RED: Pixel = Pixel::new(255, 0, 0);
    pub const NAVY: Pixel = Pixel::new(0, 0, 128);
    pub const DARK: Pixel = Pixel::new(10, 10, 10);
    pub const BRIGHT: Pixel = Pixel::new(250, 250, 250);
}

/// Gradient whose pixel at (row, col) is (row * 10, col * 10, 99).
pub fn gradient(width: usize, height: usize) -> PixelBuffer {
    let mut img = PixelBuffer::new(width, height);
    for row in 0..height {
        for col in 0..width {
            img.set(row, col, Pixel::new((row * 10) as u8, (col * 10) as u8, 99))
                .unwrap();
        }
    }
    img
}

/// Scratch directory with `images/` and `out/` subdirectories.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn input(&self, name: &str) -> PathBuf {
        self.root().join("images").join(name)
    }

    pub fn output(&self, name: &str) -> PathBuf {
        self.root().join("out").join(name)
    }

    /// Save `image` under `images/`.
    pub fn add_image(&self, name: &str, image: &PixelBuffer) -> PathBuf {
        let path = self.input(name);
        codec::encode(&path, image, EncodeOptions::default()).unwrap();
        path
    }

    /// Write `pipeline.yaml` at the workspace root.
    pub fn write_pipeline(&self, yaml: &str) -> PathBuf {
        let path = self.root().join("pipeline.yaml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    /// Decode a result from `out/`.
    pub fn read_output(&self, name: &str) -> PixelBuffer {
        codec::decode(&self.output(name), false).unwrap()
    }
}
