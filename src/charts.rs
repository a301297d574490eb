//! Chart artifact cache. Rendered chart images live on disk, one
//! directory per survey, named `q-<question_id>-<unix_timestamp>.svg`.
//! Freshness is decided by the `chart_artifacts` generation record,
//! never by parsing the filename: an artifact is reused as long as no
//! answer to its question has been modified after its recorded
//! generation time; otherwise it is deleted and a fresh one is
//! rendered from the aggregate dataset.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use color_eyre::Result;
use tokio::sync::Mutex as AsyncMutex;

use crate::db::models::{Question, Survey};
use crate::db::Db;
use crate::utils;

/// Fixed category palette, cycled across buckets.
pub const CHART_COLORS: &[&str] = &[
    // Red        green      blue       purple     orange     yellow
    "#de324c", "#95cf92", "#369acc", "#9656a2", "#f4895f", "#f8e16f",
];

#[derive(Clone)]
pub struct ChartStore {
    media_dir: PathBuf,
    // Serializes regeneration per question so two requests never race
    // on the same artifact path.
    locks: Arc<Mutex<HashMap<i64, Arc<AsyncMutex<()>>>>>,
}

impl ChartStore {
    pub fn new(media_dir: impl Into<PathBuf>) -> Self {
        Self {
            media_dir: media_dir.into(),
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Return a chart artifact for the question, regenerating it if any
    /// answer changed since it was produced. `Ok(None)` means there is
    /// no chart to show.
    pub async fn chart_for(
        &self,
        db: &Db,
        survey: &Survey,
        question: &Question,
    ) -> Result<Option<PathBuf>> {
        let lock = self.lock_for(question.id);
        let _guard = lock.lock().await;

        if let Some(artifact) = db.chart_artifact(question.id).await? {
            let path = PathBuf::from(&artifact.path);
            if path.exists() {
                match db.latest_answer_update(question.id).await? {
                    // No answers but an artifact exists: an empty-state
                    // chart never goes stale.
                    None => return Ok(Some(path)),
                    Some(latest) if artifact.generated_at >= latest => return Ok(Some(path)),
                    Some(_) => {
                        if let Err(e) = fs::remove_file(&path) {
                            tracing::warn!("could not delete stale chart {}: {e}", path.display());
                        }
                    }
                }
            }
            db.delete_chart_artifact(question.id).await?;
        }

        let Some(dataset) = db.aggregate(survey.id, question).await? else {
            return Ok(None);
        };

        let dir = self.media_dir.join(format!("s{}", survey.id));
        fs::create_dir_all(&dir)?;

        let generated_at = utils::unix_now();
        let file = dir.join(format!("q-{}-{generated_at}.svg", question.id));
        render_bar_chart(&dataset.labels(), &dataset.counts(), CHART_COLORS, &file)?;
        db.record_chart_artifact(survey.id, question.id, &file.to_string_lossy(), generated_at)
            .await?;
        tracing::info!("chart rendered: {}", file.display());

        Ok(Some(file))
    }

    fn lock_for(&self, question_id: i64) -> Arc<AsyncMutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks.entry(question_id).or_default().clone()
    }
}

const CHART_WIDTH: i64 = 640;
const CHART_HEIGHT: i64 = 400;
const MARGIN: i64 = 40;

/// Render a (labels, values, colors) triple into a static SVG bar chart
/// at the given path. Pure with respect to the inputs; the cache treats
/// it as the rendering backend.
pub fn render_bar_chart(
    labels: &[&str],
    values: &[i64],
    colors: &[&str],
    path: &Path,
) -> Result<()> {
    let max = values.iter().copied().max().unwrap_or(0).max(1);
    let plot_width = CHART_WIDTH - 2 * MARGIN;
    let plot_height = CHART_HEIGHT - 2 * MARGIN;
    let slot = plot_width / values.len().max(1) as i64;
    let bar_width = slot * 3 / 4;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {CHART_WIDTH} {CHART_HEIGHT}" font-family="sans-serif" font-size="13">"#,
    );
    let _ = write!(
        svg,
        r#"<rect width="{CHART_WIDTH}" height="{CHART_HEIGHT}" fill="white"/>"#,
    );

    for (i, (&value, &label)) in values.iter().zip(labels).enumerate() {
        let color = colors[i % colors.len()];
        let height = value * plot_height / max;
        let x = MARGIN + i as i64 * slot + (slot - bar_width) / 2;
        let y = CHART_HEIGHT - MARGIN - height;
        let _ = write!(
            svg,
            r#"<rect x="{x}" y="{y}" width="{bar_width}" height="{height}" fill="{color}"/>"#,
        );
        let center = x + bar_width / 2;
        let _ = write!(
            svg,
            r#"<text x="{center}" y="{}" text-anchor="middle">{value}</text>"#,
            y - 6,
        );
        let _ = write!(
            svg,
            r#"<text x="{center}" y="{}" text-anchor="middle">{}</text>"#,
            CHART_HEIGHT - MARGIN + 18,
            escape(label),
        );
    }

    // Baseline
    let _ = write!(
        svg,
        r##"<line x1="{MARGIN}" y1="{baseline}" x2="{}" y2="{baseline}" stroke="#333"/>"##,
        CHART_WIDTH - MARGIN,
        baseline = CHART_HEIGHT - MARGIN,
    );
    svg.push_str("</svg>");

    fs::write(path, svg)?;
    Ok(())
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
