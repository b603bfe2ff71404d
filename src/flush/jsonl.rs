use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::id::RivalId;
use crate::model::{AchievementId, GameState, RivalActivity};
use crate::sim::AchievementStore;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// One line of `rival_activity.jsonl`: a log entry tagged with its rival.
#[derive(Serialize)]
struct RivalActivityRow<'a> {
    rival_id: RivalId,
    #[serde(flatten)]
    activity: &'a RivalActivity,
}

/// Flush the career state to JSONL files in the given output directory.
///
/// Creates the output directory if it does not exist. Writes 7 files:
/// - `observations.jsonl`: one Observation per line
/// - `reports.jsonl` and `report_reviews.jsonl`
/// - `narrative_events.jsonl` and `event_chains.jsonl`
/// - `finance_history.jsonl`: one weekly statement per line
/// - `rival_activity.jsonl`: every rival's log, tagged with `rival_id`
pub fn flush_to_jsonl(state: &GameState, output_dir: &Path) -> io::Result<()> {
    fs::create_dir_all(output_dir)?;

    write_jsonl(&output_dir.join("observations.jsonl"), state.observations.values())?;
    write_jsonl(&output_dir.join("reports.jsonl"), state.reports.values())?;
    write_jsonl(&output_dir.join("report_reviews.jsonl"), state.report_reviews.values())?;
    write_jsonl(
        &output_dir.join("narrative_events.jsonl"),
        state.narrative.events.values(),
    )?;
    write_jsonl(&output_dir.join("event_chains.jsonl"), state.narrative.chains.values())?;
    write_jsonl(&output_dir.join("finance_history.jsonl"), state.finances.history.iter())?;
    write_jsonl(
        &output_dir.join("rival_activity.jsonl"),
        state.rivals.values().flat_map(|r| {
            r.activity_log.iter().map(move |activity| RivalActivityRow {
                rival_id: r.id,
                activity,
            })
        }),
    )?;

    tracing::debug!(dir = %output_dir.display(), week = state.week.week, "career flushed");
    Ok(())
}

/// Achievement unlocks kept as an append-only JSONL file, one label per line.
#[derive(Debug, Clone)]
pub struct JsonlAchievementStore {
    path: PathBuf,
}

impl JsonlAchievementStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AchievementStore for JsonlAchievementStore {
    fn load(&self) -> io::Result<BTreeSet<AchievementId>> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(e),
        };
        let mut unlocked = BTreeSet::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let id: AchievementId = serde_json::from_str(&line)?;
            unlocked.insert(id);
        }
        Ok(unlocked)
    }

    fn persist(&mut self, unlocked: &[AchievementId]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        let mut writer = BufWriter::new(file);
        for id in unlocked {
            serde_json::to_writer(&mut writer, id)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()
    }
}
