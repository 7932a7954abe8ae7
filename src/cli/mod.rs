//! Tourboost CLI Module
//!
//! Command-line entry points for single runs, feature search, prediction
//! with a saved model and dataset inspection.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::PipelineConfig;
use crate::explainability::load_ranked_features;
use crate::pipeline::Pipeline;
use crate::training::{BoostedModel, XGBoostBooster, XGBoostModel};
use crate::utils::{timestamp, DataLoader};

// ─── Styling helpers ───────────────────────────────────────────────────────────

const W: usize = 58; // box inner width

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn warn(s: &str) -> ColoredString   { s.truecolor(230, 180, 80) }

fn line_box_top()    { println!("  {}", dim("┌─────────────────────────────────────────────────────────┐")); }
fn line_box_bottom() { println!("  {}", dim("└─────────────────────────────────────────────────────────┘")); }
fn line_box_sep()    { println!("  {}", dim("├─────────────────────────────────────────────────────────┤")); }

fn line_box(content: &str) {
    let visible_len = strip_ansi(content).chars().count();
    let pad = W.saturating_sub(visible_len);
    println!("  {}  {}{} {}", dim("│"), content, " ".repeat(pad), dim("│"));
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::new();
    let mut in_escape = false;
    for c in s.chars() {
        if c == '\x1b' { in_escape = true; continue; }
        if in_escape { if c == 'm' { in_escape = false; } continue; }
        out.push(c);
    }
    out
}

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(&format!("{:<14}", key)), val.white())
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

fn step_warn(msg: &str) {
    println!("  {} {}", warn("!"), msg);
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "tourboost")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Gradient boosted order-type prediction with feature search")]
#[command(long_about = None)]
pub struct Cli {
    /// Pipeline configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train once, write predictions and feature scores
    Run,

    /// Search over numbers of dropped low-importance features
    Search {
        /// Feature ranking table with a `feature` column
        #[arg(short, long)]
        ranked_features: Option<PathBuf>,

        /// Earlier search archive to append to
        #[arg(long)]
        resume: Option<PathBuf>,
    },

    /// Score the test table with a saved model
    Predict {
        /// Trained model file
        #[arg(short, long)]
        model: PathBuf,

        /// Output predictions file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show dataset shapes and the shared feature set
    Info,
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_run(config: PipelineConfig) -> anyhow::Result<()> {
    section("Run");

    let pipeline = Pipeline::new(config, XGBoostBooster::new());

    step_run("Loading features");
    let start = Instant::now();
    let dataset = pipeline.prune(pipeline.load_dataset()?)?;
    step_done(&format!(
        "train {:?} test {:?} in {:?}",
        dataset.x_train.shape(),
        dataset.x_test.shape(),
        start.elapsed()
    ));

    step_run("Training");
    let report = pipeline.run_cv(&dataset)?;
    step_done(&format!("{:.2?}", report.elapsed));

    println!();
    println!("  {:<16} {}", muted("Best round"), report.best_round.to_string().white().bold());
    println!("  {:<16} {}", muted("Best AUC"), format!("{:.4}", report.best_score).white().bold());
    println!("  {:<16} {}", muted("Trees"), report.model.num_trees().to_string().white());
    println!();

    match &report.result_path {
        Some(path) => step_ok(&format!("Predictions saved to {}", path.display())),
        None => step_warn("Prediction failed, no result file written"),
    }
    step_ok(&format!(
        "Feature scores saved to {}",
        pipeline.config().paths.feature_score_path.display()
    ));
    if let Some(path) = &pipeline.config().train.save_model_path {
        step_ok(&format!("Model saved to {}", path.display()));
    }
    println!();

    Ok(())
}

pub fn cmd_search(
    mut config: PipelineConfig,
    ranked_features: Option<&Path>,
    resume: Option<&Path>,
) -> anyhow::Result<()> {
    section("Feature search");

    if let Some(path) = resume {
        config.search.resume_archive = Some(path.to_path_buf());
    }
    let ranked_path = ranked_features
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.data.ranked_features_path.clone());

    step_run("Loading feature ranking");
    let feature_names = load_ranked_features(&ranked_path).map_err(|e| {
        anyhow::anyhow!(
            "{} (run `tourboost run` first to produce a feature ranking): {}",
            ranked_path.display(),
            e
        )
    })?;
    step_done(&format!("{} features", feature_names.len()));

    let search = config.search.clone();
    let pipeline = Pipeline::new(config, XGBoostBooster::new());

    step_run("Loading features");
    let dataset = pipeline.load_dataset()?;
    step_done(&format!("train {:?} test {:?}", dataset.x_train.shape(), dataset.x_test.shape()));

    step_run(&format!(
        "Searching drop counts {}..{} step {}",
        search.start, search.end, search.step
    ));
    let start = Instant::now();
    let report = pipeline.run_feat_search(&dataset, &feature_names)?;
    step_done(&format!("{} iterations in {:.2?}", report.iterations, start.elapsed()));

    println!();
    let best = report
        .best_auc
        .map(|auc| format!("{:.4}", auc))
        .unwrap_or_else(|| "-".to_string());
    println!("  {:<16} {}", muted("Best AUC"), best.white().bold());
    println!("  {:<16} {}", muted("Archive entries"), report.archive.len().to_string().white());
    println!();
    step_ok(&format!("Saved y_preds to {}", report.archive_path.display()));
    println!();

    Ok(())
}

pub fn cmd_predict(config: PipelineConfig, model_path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    section("Predict");

    step_run("Loading model");
    let model = XGBoostModel::load(model_path)?;
    step_done(&format!("{} trees, {} features", model.num_trees(), model.feature_names().len()));

    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.paths.result_dir.join(format!("result_xgb_{}.csv", timestamp())));
    let pipeline = Pipeline::new(config, XGBoostBooster::new());

    step_run("Loading features");
    let dataset = pipeline.prune(pipeline.load_dataset()?)?;
    step_done(&format!("test {:?}", dataset.x_test.shape()));

    match pipeline.predict(&model, &dataset, &output)? {
        Some(pred) => step_ok(&format!("{} predictions saved to {}", pred.len(), output.display())),
        None => step_warn("Prediction failed, see log for details"),
    }
    println!();

    Ok(())
}

pub fn cmd_info(config: PipelineConfig) -> anyhow::Result<()> {
    section("Dataset");

    let loader = DataLoader::new();
    let train_info = loader.get_file_info(&config.train_path())?;
    let test_info = loader.get_file_info(&config.test_path())?;

    let pipeline = Pipeline::new(config, XGBoostBooster::new());
    let dataset = pipeline.load_dataset()?;

    line_box_top();
    line_box(&kv("Train file", &train_info.path.display().to_string()));
    line_box(&kv("Train size", &format!("{} bytes", train_info.file_size)));
    line_box(&kv("Test file", &test_info.path.display().to_string()));
    line_box(&kv("Test size", &format!("{} bytes", test_info.file_size)));
    line_box_sep();
    line_box(&kv("X_train", &format!("{:?}", dataset.x_train.shape())));
    line_box(&kv("X_test", &format!("{:?}", dataset.x_test.shape())));
    let positives = dataset.y_train.iter().filter(|&&y| y == 1.0).count();
    line_box(&kv("Positives", &format!("{} of {}", positives, dataset.y_train.len())));
    line_box_bottom();

    section("Shared features");
    for name in dataset.feature_names() {
        println!("  {}", muted(name));
    }
    println!();

    Ok(())
}
