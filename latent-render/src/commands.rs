// Copyright (c) 2025-2026 brdigetrlol. All rights reserved.
// SPDX-License-Identifier: LicenseRef-Icarus-Proprietary
// See LICENSE in the repository root for full license terms.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use latent_tensor::DatasetCache;
use latent_viz::{
    render_latent_space, render_transformer_flow, CompositionConfig, CompositionKind, LatentSpaceScene,
    TransformerScene,
};

/// Transformer animation preview tool
#[derive(Parser, Debug)]
#[command(name = "latent-render")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List registered compositions
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Write a self-contained HTML preview of one frame
    ///
    /// Examples:
    ///   latent-render preview --frame 160 --out attention.html
    ///   latent-render preview --composition LatentSpace --play 1 --out cloud.html
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Frame to render
        #[arg(short, long, default_value = "0")]
        frame: u32,

        /// Embed the frame track sampled every N frames and play it back
        #[arg(long, value_name = "N")]
        play: Option<u32>,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Dump per-frame state as JSON
    Frames {
        #[command(flatten)]
        source: SourceArgs,

        /// First frame
        #[arg(long, default_value = "0")]
        from: u32,

        /// Last frame, inclusive (defaults to the composition's last frame)
        #[arg(long)]
        to: Option<u32>,

        /// Sample every N frames
        #[arg(short, long, default_value = "1")]
        step: u32,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Dump the synthetic dataset of a transformer composition as JSON
    Dataset {
        #[command(flatten)]
        source: SourceArgs,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

/// Which composition to use and how to override it.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Registered composition id
    #[arg(short, long, default_value = "TransformerFlow")]
    pub composition: String,

    /// JSON composition config (overrides --composition)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the dataset seed
    #[arg(long, conflicts_with = "random")]
    pub seed: Option<u64>,

    /// Draw a fresh dataset from entropy
    #[arg(long)]
    pub random: bool,

    /// Override the context sentence
    #[arg(long)]
    pub sentence: Option<String>,
}

pub fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::List { json } => list(*json),
        Command::Preview {
            source,
            frame,
            play,
            out,
        } => {
            let config = resolve_config(source)?;
            let html = preview(&config, *frame, *play)?;
            write_output(out.as_deref(), &html)?;
            info!(composition = %config.id, frame, bytes = html.len(), "Wrote preview");
            Ok(())
        }
        Command::Frames {
            source,
            from,
            to,
            step,
            out,
        } => {
            let config = resolve_config(source)?;
            let json = frames(&config, *from, *to, *step)?;
            write_output(out.as_deref(), &json)?;
            info!(composition = %config.id, from, step, "Wrote frame states");
            Ok(())
        }
        Command::Dataset { source, out } => {
            let config = resolve_config(source)?;
            let json = dataset(&config)?;
            write_output(out.as_deref(), &json)?;
            info!(composition = %config.id, "Wrote dataset");
            Ok(())
        }
    }
}

pub fn resolve_config(source: &SourceArgs) -> Result<CompositionConfig> {
    let mut config = match &source.config {
        Some(path) => CompositionConfig::load(path)?,
        None => match CompositionConfig::preset(&source.composition) {
            Some(c) => c,
            None => {
                let known: Vec<String> = CompositionConfig::presets().into_iter().map(|c| c.id).collect();
                bail!("unknown composition '{}' (known: {})", source.composition, known.join(", "));
            }
        },
    };

    if let Some(seed) = source.seed {
        config.seed = Some(seed);
    }
    if source.random {
        config.seed = None;
    }
    if let Some(sentence) = &source.sentence {
        config.sentence = sentence.clone();
    }
    config.validate()?;
    Ok(config)
}

#[derive(Serialize)]
struct CompositionSummary<'a> {
    id: &'a str,
    kind: CompositionKind,
    title: &'a str,
    duration_in_frames: u32,
    fps: f64,
    width: u32,
    height: u32,
}

fn list(json: bool) -> Result<()> {
    let presets = CompositionConfig::presets();
    if json {
        let summaries: Vec<_> = presets
            .iter()
            .map(|c| CompositionSummary {
                id: &c.id,
                kind: c.kind,
                title: &c.title,
                duration_in_frames: c.duration_in_frames,
                fps: c.fps,
                width: c.width,
                height: c.height,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{:<18} {:>7} {:>5} {:>11}  TITLE", "ID", "FRAMES", "FPS", "RESOLUTION");
    for c in &presets {
        println!(
            "{:<18} {:>7} {:>5} {:>11}  {}",
            c.id,
            c.duration_in_frames,
            c.fps,
            format!("{}x{}", c.width, c.height),
            c.title
        );
    }
    Ok(())
}

fn check_frame(config: &CompositionConfig, frame: u32) -> Result<()> {
    if frame > config.last_frame() {
        bail!(
            "frame {frame} is past the end of '{}' (last frame {})",
            config.id,
            config.last_frame()
        );
    }
    Ok(())
}

pub fn preview(config: &CompositionConfig, frame: u32, play: Option<u32>) -> Result<String> {
    check_frame(config, frame)?;
    match config.kind {
        CompositionKind::TransformerFlow => {
            let mut scene = TransformerScene::new(config)?;
            scene.prepare_from_cache(&mut DatasetCache::new());
            render_transformer_flow(&scene, f64::from(frame), play)
        }
        CompositionKind::LatentSpace => {
            let scene = LatentSpaceScene::new(config)?;
            render_latent_space(&scene, f64::from(frame), play)
        }
    }
}

pub fn frames(config: &CompositionConfig, from: u32, to: Option<u32>, step: u32) -> Result<String> {
    let to = to.unwrap_or_else(|| config.last_frame());
    check_frame(config, to)?;
    if from > to {
        bail!("--from {from} is after --to {to}");
    }
    if step == 0 {
        bail!("--step must be at least 1");
    }
    let range = (from..=to).step_by(step as usize).map(f64::from);

    let json = match config.kind {
        CompositionKind::TransformerFlow => {
            let mut scene = TransformerScene::new(config)?;
            scene.prepare_from_cache(&mut DatasetCache::new());
            let states: Vec<_> = range.map(|f| scene.frame_state(f)).collect();
            serde_json::to_string_pretty(&states)?
        }
        CompositionKind::LatentSpace => {
            let scene = LatentSpaceScene::new(config)?;
            let states: Vec<_> = range.map(|f| scene.frame_state(f)).collect();
            serde_json::to_string_pretty(&states)?
        }
    };
    Ok(json)
}

pub fn dataset(config: &CompositionConfig) -> Result<String> {
    match config.kind {
        CompositionKind::TransformerFlow => {
            let data = DatasetCache::new().get_or_generate(&config.dataset_key());
            Ok(serde_json::to_string_pretty(&*data)?)
        }
        CompositionKind::LatentSpace => {
            let scene = LatentSpaceScene::new(config)?;
            Ok(serde_json::to_string_pretty(scene.nodes())?)
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content).with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{content}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(composition: &str) -> SourceArgs {
        SourceArgs {
            composition: composition.to_string(),
            config: None,
            seed: None,
            random: false,
            sentence: None,
        }
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["latent-render", "preview", "--frame", "160", "--seed", "7"]).unwrap();
        match cli.command {
            Command::Preview { source, frame, .. } => {
                assert_eq!(frame, 160);
                assert_eq!(source.seed, Some(7));
                assert_eq!(source.composition, "TransformerFlow");
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert!(Cli::try_parse_from(["latent-render", "frames", "--seed", "1", "--random"]).is_err());
    }

    #[test]
    fn test_resolve_overrides() {
        let mut args = source("transformer-flow");
        args.seed = Some(9);
        args.sentence = Some("hello there".to_string());
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.sentence, "hello there");

        let mut args = source("LatentSpace");
        args.random = true;
        assert_eq!(resolve_config(&args).unwrap().seed, None);
    }

    #[test]
    fn test_unknown_composition() {
        let err = resolve_config(&source("Nope")).unwrap_err();
        assert!(err.to_string().contains("TransformerFlow"));
    }

    #[test]
    fn test_config_file_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comp.json");
        fs::write(&path, r#"{"id": "Short", "kind": "latent_space", "duration_in_frames": 60}"#).unwrap();
        let mut args = source("ignored");
        args.config = Some(path);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.id, "Short");
        assert_eq!(config.last_frame(), 59);
    }

    #[test]
    fn test_preview_rejects_out_of_range_frame() {
        let config = CompositionConfig::transformer_flow();
        assert!(preview(&config, 300, None).is_err());
        assert!(preview(&config, 299, None).is_ok());
    }

    #[test]
    fn test_frames_json_shape() {
        let config = CompositionConfig::transformer_flow();
        let json = frames(&config, 0, Some(100), 50).unwrap();
        let states: serde_json::Value = serde_json::from_str(&json).unwrap();
        let states = states.as_array().unwrap();
        assert_eq!(states.len(), 3);
        assert_eq!(states[2]["frame"], 100.0);
        assert_eq!(states[0]["camera"]["position"][0], -50.0);

        assert!(frames(&config, 10, Some(5), 1).is_err());
        assert!(frames(&config, 0, None, 0).is_err());
    }

    #[test]
    fn test_dataset_json() {
        let json = dataset(&CompositionConfig::transformer_flow()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["embedding"]["values"].as_array().unwrap().len(), 320);

        let json = dataset(&CompositionConfig::latent_space()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 30);
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        write_output(Some(&path), "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
        assert!(write_output(Some(&dir.path().join("missing/out.html")), "x").is_err());
    }
}
