//! Export pagination — slices one tall snapshot image across fixed-height pages.
//!
//! The whole image is drawn on every page at full page width; each page shifts
//! it further up by one page height so the next vertical slice shows through.
//! Only the offsets are computed here. Capturing the snapshot and drawing the
//! pages belong to the export sink.
//!
//! ```text
//! page 1: y = 0            ┌────────┐
//! page 2: y = -pageHeight  │ slice 1│
//! page 3: y = -2·pageHeight│ slice 2│ ...
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed name of the exported document.
pub const EXPORT_FILENAME: &str = "IntellibaseNLQ_Chat_Export.pdf";

/// Upper bound on pages in one export.
pub const MAX_PAGES: usize = 500;

#[derive(Debug, Error, PartialEq)]
pub enum PlanError {
    #[error("snapshot would need more than {max} pages")]
    TooManyPages { max: usize },
}

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Target page size in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width_pt: f64,
    pub height_pt: f64,
}

impl PageSize {
    /// ISO A4 portrait.
    pub const A4: PageSize = PageSize {
        width_pt: 595.28,
        height_pt: 841.89,
    };

    fn is_usable(&self) -> bool {
        self.width_pt.is_finite()
            && self.height_pt.is_finite()
            && self.width_pt > 0.0
            && self.height_pt > 0.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// Where to draw the image on one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PagePlacement {
    /// 1-based page number.
    pub page: usize,
    pub y_offset_pt: f64,
}

/// Everything the export sink needs to lay the snapshot out.
#[derive(Debug, Clone, Serialize)]
pub struct ExportPlan {
    pub filename: &'static str,
    pub page_width_pt: f64,
    pub page_height_pt: f64,
    pub image_width_pt: f64,
    pub image_height_pt: f64,
    pub placements: Vec<PagePlacement>,
}

// ────────────────────────────────────────────────────────────────────────────
// Core functions
// ────────────────────────────────────────────────────────────────────────────

/// Height of the snapshot once scaled to exactly fill the page width.
pub fn scaled_image_height(canvas_height_px: u32, canvas_width_px: u32, page_width_pt: f64) -> f64 {
    if canvas_width_px == 0 {
        return 0.0;
    }
    f64::from(canvas_height_px) * page_width_pt / f64::from(canvas_width_px)
}

/// Pages needed to show an image of `image_height` points, at least one.
///
/// `None` when the count cannot be represented (non-finite height).
fn pages_needed(image_height: f64, page_height_pt: f64) -> Option<f64> {
    let pages = (image_height / page_height_pt).ceil().max(1.0);
    pages.is_finite().then_some(pages)
}

/// Returns the vertical offset of the full image for each page.
///
/// Always at least one page, never more than `MAX_PAGES`. Degenerate input
/// (zero-sized canvas, unusable page size, unbounded scaled height) yields the
/// single offset `0.0`. Offset `i` is `-i · page_height`, so a page that would
/// show nothing past the end of the image is never emitted.
pub fn paginate(
    canvas_height_px: u32,
    canvas_width_px: u32,
    page_width_pt: f64,
    page_height_pt: f64,
) -> Vec<f64> {
    let page = PageSize {
        width_pt: page_width_pt,
        height_pt: page_height_pt,
    };
    if canvas_height_px == 0 || canvas_width_px == 0 || !page.is_usable() {
        return vec![0.0];
    }

    let image_height = scaled_image_height(canvas_height_px, canvas_width_px, page_width_pt);
    let Some(pages) = pages_needed(image_height, page_height_pt) else {
        return vec![0.0];
    };

    let pages = pages.min(MAX_PAGES as f64) as usize;
    (0..pages)
        .map(|i| 0.0 - i as f64 * page_height_pt)
        .collect()
}

/// Builds the full export plan for a snapshot of the given pixel size.
///
/// Fails instead of truncating when the snapshot needs more than `MAX_PAGES` pages.
pub fn plan_export(
    canvas_width_px: u32,
    canvas_height_px: u32,
    page: PageSize,
) -> Result<ExportPlan, PlanError> {
    let image_height_pt = scaled_image_height(canvas_height_px, canvas_width_px, page.width_pt);
    if page.is_usable() {
        let within_limit = pages_needed(image_height_pt, page.height_pt)
            .is_some_and(|pages| pages <= MAX_PAGES as f64);
        if !within_limit {
            return Err(PlanError::TooManyPages { max: MAX_PAGES });
        }
    }

    let placements = paginate(
        canvas_height_px,
        canvas_width_px,
        page.width_pt,
        page.height_pt,
    )
    .into_iter()
    .enumerate()
    .map(|(i, y_offset_pt)| PagePlacement {
        page: i + 1,
        y_offset_pt,
    })
    .collect();

    Ok(ExportPlan {
        filename: EXPORT_FILENAME,
        page_width_pt: page.width_pt,
        page_height_pt: page.height_pt,
        image_width_pt: page.width_pt,
        image_height_pt,
        placements,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
