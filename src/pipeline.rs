//! 画像選択 → 寸法取得/解析 → オーバーレイ → 出力 の一連の流れ
//!
//! 寸法取得と解析リクエストは同時に走らせ、どちらが先に終わっても
//! セッションへの反映結果は同じになる。

use crate::client::{request_analysis, AnalysisClient};
use crate::cli::ExportFormat;
use crate::error::Result;
use crate::export::{export_results, ExportSummary, FileSink, ReportContext};
use crate::image_source::{check_image_file, load_dimensions, open_image};
use crate::raster::{Rasterize, ResultPanel};
use image::DynamicImage;
use medscan_common::{map_regions, AnalysisOutcome, ImageHandle, Overlay, Session};
use std::path::Path;
use tracing::{debug, warn};

/// セッションを通して解析と出力を行う
pub async fn run_session<C: AnalysisClient>(
    client: &C,
    image_path: &Path,
    ctx: &ReportContext,
    format: &ExportFormat,
    container_width: f64,
    sink: &mut dyn FileSink,
) -> Result<(Session, ExportSummary)> {
    check_image_file(image_path, ctx.kind)?;

    let mut session = Session::with_container_width(ctx.kind, container_width);
    let generation = session.select_image(image_path.display().to_string());
    let ticket = session.begin_analysis()?;

    println!("- 解析中... ({})", ctx.kind.title());
    let (dims, outcome) = tokio::join!(
        load_dimensions(image_path),
        request_analysis(client, ctx.kind, image_path)
    );

    match dims {
        Ok((w, h)) => {
            session.image_loaded(generation, w, h);
        }
        Err(e) => warn!("画像寸法を取得できません（オーバーレイなし）: {}", e),
    }
    if !session.complete_analysis(ticket, outcome) {
        warn!("古い解析結果を破棄しました");
    }

    if let Some(error) = session.outcome().and_then(|o| o.error()) {
        println!("✘ {}", error);
    }

    let image = if session.display_geometry().is_degenerate() {
        None
    } else {
        open_image(image_path).ok()
    };
    let overlay = session.overlay();
    debug!(rects = overlay.rects.len(), "オーバーレイ計算");

    let summary = export_outcome(
        image.as_ref(),
        &overlay,
        session.outcome(),
        session.container_width(),
        format,
        ctx,
        sink,
    )?;
    Ok((session, summary))
}

/// 保存済みの解析結果から出力する
pub async fn export_saved(
    image_path: &Path,
    outcome: &AnalysisOutcome,
    ctx: &ReportContext,
    format: &ExportFormat,
    container_width: f64,
    sink: &mut dyn FileSink,
) -> Result<ExportSummary> {
    let overlay = overlay_for(image_path, outcome, container_width).await;
    let image = if overlay.geometry.is_degenerate() {
        None
    } else {
        open_image(image_path).ok()
    };
    export_outcome(image.as_ref(), &overlay, Some(outcome), container_width, format, ctx, sink)
}

/// 画像寸法を読み込み、腫瘍ありの場合のみ枠を含むオーバーレイを返す
pub async fn overlay_for(image_path: &Path, outcome: &AnalysisOutcome, container_width: f64) -> Overlay {
    let handle = ImageHandle::pending(image_path.display().to_string());
    let handle = match load_dimensions(image_path).await {
        Ok((w, h)) => handle.with_dimensions(w, h),
        Err(e) => {
            warn!("画像寸法を取得できません（オーバーレイなし）: {}", e);
            handle
        }
    };

    let regions = outcome
        .result()
        .filter(|r| r.has_regions())
        .map(|r| r.tumor_regions.as_slice())
        .unwrap_or(&[]);
    map_regions(&handle, container_width, regions)
}

fn export_outcome(
    image: Option<&DynamicImage>,
    overlay: &Overlay,
    outcome: Option<&AnalysisOutcome>,
    container_width: f64,
    format: &ExportFormat,
    ctx: &ReportContext,
    sink: &mut dyn FileSink,
) -> Result<ExportSummary> {
    let panel = outcome.and_then(|o| o.result()).map(|result| ResultPanel {
        image,
        overlay,
        result,
        labels: &ctx.labels,
        container_width,
    });
    let panel = panel.as_ref().map(|p| p as &dyn Rasterize);

    export_results(outcome, panel, format, ctx, sink)
}
