//! Axum route handlers for the Export API.

use axum::{extract::Multipart, Json};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::paginator::{plan_export, ExportPlan, PageSize};
use crate::export::snapshot::png_dimensions;

const SNAPSHOT_FIELD: &str = "snapshot";

#[derive(Debug, Deserialize)]
pub struct ExportPlanRequest {
    pub canvas_width_px: u32,
    pub canvas_height_px: u32,
    #[serde(default)]
    pub page: Option<PageSize>,
}

/// POST /api/v1/export/plan
///
/// Page placements for a snapshot of known pixel size. Defaults to A4.
pub async fn handle_export_plan(
    Json(request): Json<ExportPlanRequest>,
) -> Result<Json<ExportPlan>, AppError> {
    let page = request.page.unwrap_or_default();
    let plan = plan_export(request.canvas_width_px, request.canvas_height_px, page)?;
    Ok(Json(plan))
}

/// POST /api/v1/export/snapshot (multipart, field `snapshot` = PNG)
///
/// Reads the snapshot's size from its PNG header and returns the A4 plan.
pub async fn handle_export_snapshot(mut multipart: Multipart) -> Result<Json<ExportPlan>, AppError> {
    let mut snapshot: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some(SNAPSHOT_FIELD) {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("unreadable snapshot: {e}")))?;
            snapshot = Some(data);
        }
    }

    let snapshot = snapshot
        .ok_or_else(|| AppError::Validation(format!("missing '{SNAPSHOT_FIELD}' field")))?;
    let (width, height) = png_dimensions(&snapshot)?;

    let plan = plan_export(width, height, PageSize::A4)?;
    info!(
        width,
        height,
        pages = plan.placements.len(),
        "export plan computed from snapshot"
    );
    Ok(Json(plan))
}
