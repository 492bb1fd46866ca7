use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use squat_reps::{Analyzer, AnalyzerConfig, ExerciseKind, FrameStatus, Point};
use std::{
    fs::File,
    io::{self, BufRead, BufReader, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};
use structopt::StructOpt;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt;

/// One recorded frame: keypoints indexed by joint, `null` where nothing was detected.
#[derive(Debug, serde::Deserialize)]
struct Frame {
    keypoints: Vec<Option<[f32; 2]>>,
    #[serde(default)]
    fps: Option<f32>,
}

impl Frame {
    /// Coordinates that are not finite numbers count as undetected joints.
    fn points(&self, line_number: usize) -> Vec<Option<Point>> {
        self.keypoints
            .iter()
            .enumerate()
            .map(|(joint, &keypoint)| {
                let [x, y] = keypoint?;
                Point::new(x, y)
                    .map_err(|error| {
                        warn!(message = "dropping keypoint", line = line_number, joint, %error)
                    })
                    .ok()
            })
            .collect()
    }
}

#[derive(Debug, Default, serde::Serialize)]
struct Summary {
    exercise: Option<ExerciseKind>,
    frames: usize,
    analyzed: usize,
    skipped: usize,
    insufficient_data: usize,
    unsupported: usize,
    reps: u32,
}

impl Summary {
    fn record(&mut self, status: FrameStatus, reps: u32) {
        self.frames += 1;
        self.reps = reps;
        match status {
            FrameStatus::Analyzed => self.analyzed += 1,
            FrameStatus::Skipped => self.skipped += 1,
            FrameStatus::InsufficientData => self.insufficient_data += 1,
            FrameStatus::Unsupported => self.unsupported += 1,
        }
    }
}

#[derive(structopt::StructOpt)]
struct Opt {
    /// JSON Lines file of recorded keypoint frames, `-` for stdin.
    ///
    /// Ctrl-C takes effect once the pending line is read, so an idle terminal on
    /// stdin also needs Enter or Ctrl-D.
    #[structopt(default_value = "-")]
    input: PathBuf,

    /// Exercise to analyze, by name or selector number.
    #[structopt(short, long, default_value = "squat")]
    exercise: ExerciseKind,

    /// Frame rate to assume for every frame, overriding the recorded one.
    #[structopt(short, long)]
    fps: Option<f32>,

    #[structopt(short, long, default_value = "info", env = "RUST_LOG")]
    log_level: tracing_subscriber::filter::EnvFilter,

    /// Only print the summary, not the per-frame results.
    #[structopt(long)]
    summary_only: bool,

    #[structopt(short, long)]
    show_progress: bool,

    #[structopt(flatten)]
    config: AnalyzerConfig,
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(BufReader::new(io::stdin())))
    } else {
        let file = File::open(path)
            .with_context(|| format!("failed to open input file {}", path.display()))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

fn main() -> Result<()> {
    let opt = Opt::from_args();

    tracing::subscriber::set_global_default(
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(opt.log_level),
    )?;

    let running = Arc::new(AtomicBool::new(true));
    let running_ctrl_c = running.clone();

    ctrlc::set_handler(move || {
        running_ctrl_c.store(false, Ordering::SeqCst);
    })
    .context("failed setting Ctrl-C handler")?;

    let pb_reps = if opt.show_progress {
        Some(
            ProgressBar::new_spinner().with_style(
                ProgressStyle::default_spinner()
                    .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
                    .template("{prefix:.bold.dim} {spinner} {wide_msg}"),
            ),
        )
    } else {
        None
    };

    let mut analyzer = Analyzer::new(&opt.config);
    let mut summary = Summary {
        exercise: Some(opt.exercise),
        ..Summary::default()
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    info!(message = "replaying frames", exercise = ?opt.exercise, input = %opt.input.display());

    for (line_number, line) in open_input(&opt.input)?.lines().enumerate() {
        // reads block, so a line that arrives after Ctrl-C is dropped
        let line = line.context("failed reading frame")?;
        if !running.load(Ordering::SeqCst) {
            info!(message = "interrupted", frames = summary.frames);
            break;
        }

        if line.trim().is_empty() {
            continue;
        }

        let frame: Frame = serde_json::from_str(&line)
            .with_context(|| format!("failed parsing frame on line {}", line_number + 1))?;
        let points = frame.points(line_number + 1);

        let result = analyzer.analyze(opt.exercise, &points, opt.fps.or(frame.fps));
        summary.record(result.status, result.rep_count);

        if result.rep_detected {
            debug!(message = "rep", line = line_number + 1, count = result.rep_count);
        }

        if !opt.summary_only {
            serde_json::to_writer(&mut out, &result).context("failed writing result")?;
            writeln!(out).context("failed writing result")?;
        }

        if let Some(pb_reps) = pb_reps.as_ref() {
            pb_reps.set_message(format!(
                "reps: {}, frames: {}, {}",
                result.rep_count, summary.frames, result.feedback
            ));
            pb_reps.inc(1);
        }
    }

    if let Some(pb_reps) = pb_reps {
        pb_reps.finish_and_clear();
    }

    serde_json::to_writer(&mut out, &summary).context("failed writing summary")?;
    writeln!(out).context("failed writing summary")?;

    info!(message = "done", reps = summary.reps, frames = summary.frames);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_keypoint_is_undetected() {
        let frame: Frame =
            serde_json::from_str(r#"{"keypoints": [[1e39, 320.0], [100.0, 400.0], null]}"#)
                .unwrap();
        let points = frame.points(1);
        assert_eq!(points.len(), 3);
        assert!(points[0].is_none());
        assert_eq!(points[1], Some(Point::new(100.0, 400.0).unwrap()));
        assert!(points[2].is_none());
        assert_eq!(frame.fps, None);
    }
}
