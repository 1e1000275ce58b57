//! CLI configuration parsing.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};

const USAGE: &str = "Usage: pushup-trainer --model <path> [--bind <addr:port>] \
[--jpeg-quality <1-100>] [--min-score <0.0-1.0>] [--verbose]\n\nPositional form is \
also supported: pushup-trainer <model-path> [...flags...]";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind: String,
    pub model_path: PathBuf,
    pub jpeg_quality: u8,
    pub min_score: f32,
    pub verbose: bool,
}

impl ServerConfig {
    pub fn from_args(args: &[String]) -> Result<Self> {
        let mut bind: Option<String> = None;
        let mut model_path: Option<PathBuf> = None;
        let mut jpeg_quality: Option<u8> = None;
        let mut min_score: Option<f32> = None;
        let mut verbose = false;
        let mut positional: Vec<String> = Vec::new();

        let mut idx = 1;
        while idx < args.len() {
            match args[idx].as_str() {
                "--bind" => {
                    idx += 1;
                    let value = args
                        .get(idx)
                        .ok_or_else(|| anyhow!("--bind requires a value"))?
                        .clone();
                    bind = Some(value);
                    idx += 1;
                }
                "--model" => {
                    idx += 1;
                    let value = args
                        .get(idx)
                        .ok_or_else(|| anyhow!("--model requires a value"))?
                        .clone();
                    model_path = Some(PathBuf::from(value));
                    idx += 1;
                }
                "--jpeg-quality" => {
                    idx += 1;
                    let value = args
                        .get(idx)
                        .ok_or_else(|| anyhow!("--jpeg-quality requires a value"))?
                        .parse::<u8>()
                        .with_context(|| {
                            "--jpeg-quality must be an integer between 1 and 100".to_string()
                        })?;
                    if !(1..=100).contains(&value) {
                        bail!("--jpeg-quality must be an integer between 1 and 100");
                    }
                    jpeg_quality = Some(value);
                    idx += 1;
                }
                "--min-score" => {
                    idx += 1;
                    let value = args
                        .get(idx)
                        .ok_or_else(|| anyhow!("--min-score requires a value"))?
                        .parse::<f32>()
                        .with_context(|| "--min-score must be a number in [0, 1]".to_string())?;
                    if !(0.0..=1.0).contains(&value) {
                        bail!("--min-score must be a number in [0, 1]");
                    }
                    min_score = Some(value);
                    idx += 1;
                }
                "--verbose" => {
                    verbose = true;
                    idx += 1;
                }
                "--help" | "-h" => {
                    bail!(USAGE);
                }
                arg if arg.starts_with('-') => {
                    bail!("Unrecognised flag: {arg}\n\n{USAGE}");
                }
                other => {
                    positional.push(other.to_string());
                    idx += 1;
                }
            }
        }

        if model_path.is_none() {
            model_path = positional.into_iter().next().map(PathBuf::from);
        }
        let model_path = model_path.ok_or_else(|| {
            anyhow!("Missing model path. Provide --model <path> or positional <model-path>.\n\n{USAGE}")
        })?;

        Ok(Self {
            bind: bind.unwrap_or_else(|| "0.0.0.0:8000".to_string()),
            model_path,
            jpeg_quality: jpeg_quality.unwrap_or(80),
            min_score: min_score.unwrap_or(0.3),
            verbose,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        std::iter::once("pushup-trainer")
            .chain(parts.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn defaults_applied() {
        let config = ServerConfig::from_args(&args(&["--model", "movenet.onnx"])).unwrap();
        assert_eq!(config.bind, "0.0.0.0:8000");
        assert_eq!(config.jpeg_quality, 80);
        assert!((config.min_score - 0.3).abs() < f32::EPSILON);
        assert!(!config.verbose);
    }

    #[test]
    fn positional_model_path() {
        let config = ServerConfig::from_args(&args(&["movenet.onnx", "--verbose"])).unwrap();
        assert_eq!(config.model_path, PathBuf::from("movenet.onnx"));
        assert!(config.verbose);
    }

    #[test]
    fn rejects_out_of_range_quality() {
        assert!(ServerConfig::from_args(&args(&["--model", "m.onnx", "--jpeg-quality", "0"])).is_err());
        assert!(ServerConfig::from_args(&args(&["--model", "m.onnx", "--jpeg-quality", "101"])).is_err());
    }

    #[test]
    fn missing_model_is_an_error() {
        assert!(ServerConfig::from_args(&args(&["--verbose"])).is_err());
    }
}
