use std::io::Write;
use std::path::Path;
use std::process::{Child, ChildStdin, Command, Stdio};

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use raylib::prelude::*;

/// Encodes rendered frames into a video file by piping raw RGBA rows into
/// an `ffmpeg` child process.
pub struct Ffmpeg {
    process: Child,
    stdin: Option<ChildStdin>,
    frames: u64,
}

impl Ffmpeg {
    pub fn new(width: i32, height: i32, fps: u32, output: &Path) -> Result<Ffmpeg> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(output)
            .spawn()
            .context("Failed to start ffmpeg process")?;
        let stdin = process.stdin.take().ok_or_else(|| anyhow!("Failed to open ffmpeg stdin"))?;
        info!("recording {}x{} @ {} fps into {:?}", width, height, fps, output);
        Ok(Ffmpeg { process, stdin: Some(stdin), frames: 0 })
    }

    /// Writes one frame. Render textures come back bottom-up, so rows are
    /// emitted in reverse.
    pub fn write(&mut self, image: &Image) -> Result<()> {
        let stdin = self.stdin.as_mut().ok_or_else(|| anyhow!("ffmpeg stdin already closed"))?;
        let width = image.width().max(0) as usize;
        let height = image.height().max(0) as usize;
        let row_len = width * 4;

        let pixels = unsafe { std::slice::from_raw_parts(image.data() as *const u8, row_len * height) };
        for row in pixels.chunks_exact(row_len.max(1)).rev() {
            stdin.write_all(row).context("Failed to write frame to ffmpeg")?;
        }
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Drop for Ffmpeg {
    fn drop(&mut self) {
        // Closing stdin lets ffmpeg flush and exit.
        self.stdin = None;
        match self.process.wait() {
            Ok(status) if status.success() => info!("ffmpeg finished after {} frames", self.frames),
            Ok(status) => warn!("ffmpeg exited with {}", status),
            Err(e) => warn!("Failed to wait for ffmpeg process: {}", e),
        }
    }
}
