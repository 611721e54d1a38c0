//! LAC command-line front end
//!
//! Reads one query per line from stdin until an empty line or EOF and prints
//! the analysis of each batch as JSON (default) or as `word/tag` text.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use lac_core::{format_plain, BatchOutput, Lac, LacConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Parser)]
#[command(name = "lac")]
#[command(about = "Chinese lexical analysis: word segmentation and POS tagging")]
#[command(version)]
struct Cli {
    /// Model directory containing conf/word.dic, q2b.dic and tag.dic
    #[arg(env = "LAC_MODEL_DIR", default_value = "models/lac_model")]
    model_dir: PathBuf,

    /// Lexicon for the dictionary tagger [default: <MODEL_DIR>/conf/lexicon.dic]
    #[arg(short, long, env = "LAC_LEXICON")]
    lexicon: Option<PathBuf>,

    /// User dictionary applied before decoding
    #[arg(short, long, env = "LAC_USER_DICT")]
    dict: Option<PathBuf>,

    /// Print `word/tag` text instead of JSON
    #[arg(short = 'n', long)]
    plain: bool,

    /// Number of lines analyzed per call
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    batch_size: u32,
}

/// Read up to `size` queries. Returns the batch and whether input has ended.
fn next_batch<R: BufRead>(lines: &mut io::Lines<R>, size: usize) -> Result<(Vec<String>, bool)> {
    let mut batch = Vec::with_capacity(size);
    while batch.len() < size {
        match lines.next() {
            Some(line) => {
                let line = line.context("failed to read stdin")?;
                let line = line.trim_end_matches('\r');
                if line.is_empty() {
                    return Ok((batch, true));
                }
                batch.push(line.to_string());
            }
            None => return Ok((batch, true)),
        }
    }
    Ok((batch, false))
}

/// Log the failed sequences of a batch.
fn report_errors(queries: &[String], output: &BatchOutput) {
    for failure in &output.errors {
        let query = queries.get(failure.sequence).map(String::as_str).unwrap_or_default();
        error!(query, error = %failure.error, "analysis failed");
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = LacConfig::new(&cli.model_dir);
    if let Some(lexicon) = &cli.lexicon {
        config = config.with_lexicon(lexicon);
    }
    if let Some(dict) = &cli.dict {
        config = config.with_user_dict(dict);
    }

    let start = Instant::now();
    let mut lac = Lac::from_config(&config)
        .with_context(|| format!("failed to load model from {}", cli.model_dir.display()))?;
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "model initialized");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    loop {
        let (queries, done) = next_batch(&mut lines, cli.batch_size as usize)?;
        if !queries.is_empty() {
            let start = Instant::now();
            let results = lac.run_batch(&queries).context("batch analysis failed")?;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            info!(batch = queries.len(), elapsed_ms, "analyzed batch");

            let output = BatchOutput::from_results(results, elapsed_ms);
            report_errors(&queries, &output);
            if cli.plain {
                for sequence in &output.results {
                    writeln!(out, "{}", format_plain(sequence))?;
                }
            } else {
                writeln!(out, "{}", serde_json::to_string(&output)?)?;
            }
            out.flush()?;
        }
        if done {
            break;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use lac_core::{LacError, Word};

    fn lines(input: &str) -> io::Lines<io::Cursor<&[u8]>> {
        io::Cursor::new(input.as_bytes()).lines()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_batches_stop_at_empty_line() {
        let mut input = lines("一\n二\n三\n\n四\n");
        let (batch, done) = next_batch(&mut input, 2).unwrap();
        assert_eq!(batch, vec!["一", "二"]);
        assert!(!done);

        let (batch, done) = next_batch(&mut input, 2).unwrap();
        assert_eq!(batch, vec!["三"]);
        assert!(done);
    }

    #[test]
    fn test_batches_stop_at_eof() {
        let mut input = lines("一\r\n二");
        let (batch, done) = next_batch(&mut input, 8).unwrap();
        assert_eq!(batch, vec!["一", "二"]);
        assert!(done);
    }

    #[test]
    fn test_failed_query_is_reported_in_json() {
        let queries = vec!["好".to_string(), "坏".to_string()];
        let results = vec![
            Ok(vec![Word::new("好", "a")]),
            Err(LacError::RankModeDisabled),
        ];
        let output = BatchOutput::from_results(results, 0);
        report_errors(&queries, &output);

        let json: serde_json::Value = serde_json::to_value(&output).unwrap();
        assert_eq!(json["results"][1], serde_json::json!([]));
        assert_eq!(json["errors"][0]["sequence"], 1);
        assert_eq!(json["errors"][0]["error"], "rank mode is not enabled");
    }

    #[test]
    fn test_batch_size_must_be_positive() {
        assert!(Cli::try_parse_from(["lac", "--batch-size", "0"]).is_err());
        let cli = Cli::try_parse_from(["lac", "/opt/lac", "-b", "4", "--plain"]).unwrap();
        assert_eq!(cli.batch_size, 4);
        assert!(cli.plain);
        assert_eq!(cli.model_dir, PathBuf::from("/opt/lac"));

        let cli = Cli::try_parse_from(["lac", "/opt/lac", "--lexicon", "/srv/words.tsv"]).unwrap();
        assert_eq!(cli.lexicon, Some(PathBuf::from("/srv/words.tsv")));
    }
}
