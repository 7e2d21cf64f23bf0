//! Monitor capture and screenshot files.

use std::{
    fs,
    io::Cursor,
    panic::Location,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use directories::UserDirs;
use error_location::ErrorLocation;
use flicker_core::{CoreError, CoreResult};
use image::{ImageFormat, RgbaImage, imageops};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use xcap::Monitor;

const SCREENSHOTS_DIR: &str = "Flicker Screenshots";

/// A screenshot written to disk, with its encoded bytes.
#[derive(Debug)]
pub struct SavedScreenshot {
    pub path: PathBuf,
    pub file_name: String,
    pub png: Vec<u8>,
}

/// Position and size of a monitor on the virtual desktop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Smallest rectangle covering every monitor.
pub fn virtual_bounds(monitors: &[MonitorBounds]) -> Option<MonitorBounds> {
    let first = monitors.first()?;
    let (mut min_x, mut min_y) = (i64::from(first.x), i64::from(first.y));
    let (mut max_x, mut max_y) = (right(first), bottom(first));

    for m in &monitors[1..] {
        min_x = min_x.min(i64::from(m.x));
        min_y = min_y.min(i64::from(m.y));
        max_x = max_x.max(right(m));
        max_y = max_y.max(bottom(m));
    }

    Some(MonitorBounds {
        x: i32::try_from(min_x).unwrap_or_default(),
        y: i32::try_from(min_y).unwrap_or_default(),
        width: u32::try_from(max_x - min_x).unwrap_or_default(),
        height: u32::try_from(max_y - min_y).unwrap_or_default(),
    })
}

fn right(m: &MonitorBounds) -> i64 {
    i64::from(m.x) + i64::from(m.width)
}

fn bottom(m: &MonitorBounds) -> i64 {
    i64::from(m.y) + i64::from(m.height)
}

/// Paste each capture at its offset inside the virtual desktop.
pub fn composite(captures: &[(MonitorBounds, RgbaImage)]) -> Option<RgbaImage> {
    let bounds: Vec<MonitorBounds> = captures.iter().map(|(b, _)| *b).collect();
    let area = virtual_bounds(&bounds)?;

    let mut canvas = RgbaImage::new(area.width, area.height);
    for (b, image) in captures {
        imageops::overlay(
            &mut canvas,
            image,
            i64::from(b.x) - i64::from(area.x),
            i64::from(b.y) - i64::from(area.y),
        );
    }

    Some(canvas)
}

/// `screenshot[_all]_<YYYYmmdd_HHMMSS>_<8 hex>.png`
pub fn screenshot_file_name(all_monitors: bool, now: DateTime<Local>, id: Uuid) -> String {
    let simple = id.simple().to_string();
    format!(
        "screenshot{}_{}_{}.png",
        if all_monitors { "_all" } else { "" },
        now.format("%Y%m%d_%H%M%S"),
        &simple[..8]
    )
}

/// Capture, encode and save a screenshot. Blocking.
#[instrument]
pub fn take_screenshot(all_monitors: bool, monitor_index: Option<usize>) -> CoreResult<SavedScreenshot> {
    let image = if all_monitors {
        capture_all_monitors()?
    } else {
        capture_monitor(monitor_index)?
    };

    let file_name = screenshot_file_name(all_monitors, Local::now(), Uuid::new_v4());
    let dir = screenshots_dir()?;
    let saved = save_png(&image, &dir, file_name)?;

    info!(
        path = ?saved.path,
        width = image.width(),
        height = image.height(),
        bytes = saved.png.len(),
        "Screenshot saved"
    );

    Ok(saved)
}

fn capture_monitor(monitor_index: Option<usize>) -> CoreResult<RgbaImage> {
    let monitors = all_monitors()?;

    let monitor = match monitor_index {
        Some(index) => monitors
            .get(index)
            .ok_or_else(|| capture_failed(format!("Monitor {} not found", index)))?,
        None => monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or_else(|| capture_failed("No screens found".to_string()))?,
    };

    monitor
        .capture_image()
        .map_err(|e| capture_failed(format!("Failed to capture screen: {}", e)))
}

fn capture_all_monitors() -> CoreResult<RgbaImage> {
    let monitors = all_monitors()?;

    let mut captures = Vec::with_capacity(monitors.len());
    for monitor in &monitors {
        let bounds = MonitorBounds {
            x: monitor.x().unwrap_or(0),
            y: monitor.y().unwrap_or(0),
            width: monitor.width().unwrap_or(0),
            height: monitor.height().unwrap_or(0),
        };
        let image = monitor
            .capture_image()
            .map_err(|e| capture_failed(format!("Failed to capture screen: {}", e)))?;
        debug!(?bounds, "Captured monitor");
        captures.push((bounds, image));
    }

    composite(&captures).ok_or_else(|| capture_failed("No screens found".to_string()))
}

fn all_monitors() -> CoreResult<Vec<Monitor>> {
    let monitors =
        Monitor::all().map_err(|e| capture_failed(format!("Failed to get screens: {}", e)))?;
    if monitors.is_empty() {
        return Err(capture_failed("No screens found".to_string()));
    }
    Ok(monitors)
}

fn screenshots_dir() -> CoreResult<PathBuf> {
    let dirs =
        UserDirs::new().ok_or_else(|| capture_failed("Could not find home directory".to_string()))?;
    let base = dirs
        .picture_dir()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dirs.home_dir().to_path_buf());
    Ok(base.join(SCREENSHOTS_DIR))
}

fn save_png(image: &RgbaImage, dir: &Path, file_name: String) -> CoreResult<SavedScreenshot> {
    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| capture_failed(format!("Failed to encode screenshot: {}", e)))?;

    fs::create_dir_all(dir)
        .map_err(|e| capture_failed(format!("Failed to create screenshots directory: {}", e)))?;

    let path = dir.join(&file_name);
    fs::write(&path, &png).map_err(|e| capture_failed(format!("Failed to save screenshot: {}", e)))?;

    Ok(SavedScreenshot {
        path,
        file_name,
        png,
    })
}

#[track_caller]
fn capture_failed(reason: String) -> CoreError {
    CoreError::CaptureFailed {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}
