use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use exif::{In, Reader, Tag, Value};
use log::{debug, warn};
use raylib::prelude::*;

/// A loaded image together with its natural pixel size.
pub struct Asset {
    pub texture: Texture2D,
    pub width: u32,
    pub height: u32,
}

impl Asset {
    /// Natural dimensions, or `None` for a degenerate image.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        (self.width > 0 && self.height > 0).then_some((self.width, self.height))
    }
}

/// Loads an image as a texture; a failure is logged and reported as `None`
/// so the caller can fall back instead of aborting.
pub fn load_asset(rl: &mut RaylibHandle, thread: &RaylibThread, image_path: &Path) -> Option<Asset> {
    match load_texture_with_exif_rotation(rl, thread, image_path) {
        Ok(texture) => {
            let width = texture.width().max(0) as u32;
            let height = texture.height().max(0) as u32;
            debug!("loaded {:?} ({}x{})", image_path, width, height);
            Some(Asset { texture, width, height })
        }
        Err(e) => {
            warn!("{:#}", e);
            None
        }
    }
}

// --- Load Image, Apply EXIF Rotation, Create Texture ---
pub fn load_texture_with_exif_rotation(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    image_path: &Path,
) -> Result<Texture2D> {
    let file_bytes = fs::read(image_path)
        .with_context(|| format!("Failed to read file {:?}", image_path))?;

    let extension = image_path.extension().and_then(|s| s.to_str()).unwrap_or("").to_lowercase();
    let orientation = if extension == "jpg" || extension == "jpeg" {
        read_orientation(&file_bytes, image_path)
    } else {
        1
    };

    // Provide extension hint for loading from memory
    let mut image = Image::load_image_from_mem(&(".".to_string() + &extension), &file_bytes)
        .map_err(|e| anyhow!("Failed to load image data for {:?}: {}", image_path, e))?;

    // 1 = normal, 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW; flips are ignored
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }

    let texture = rl.load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("Failed to create texture for {:?}: {}", image_path, e))?;

    // CPU copy is no longer needed once uploaded
    drop(image);

    Ok(texture)
}

fn read_orientation(file_bytes: &[u8], image_path: &Path) -> u16 {
    match Reader::new().read_from_container(&mut Cursor::new(file_bytes)) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| match &field.value {
                Value::Short(values) => values.first().copied(),
                _ => None,
            })
            .unwrap_or(1),
        Err(e) => {
            warn!("Could not read EXIF data for {:?}: {}", image_path, e);
            1
        }
    }
}
