//! Seed list assembly from positional arguments and seed files

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

/// Parse a seed file: one identifier per line, `#` starts a comment
pub fn parse_seed_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.split_once('#').map_or(line, |(before, _)| before).trim())
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

pub fn read_seed_file(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seeds file: {}", path.display()))?;
    Ok(parse_seed_file(&content))
}

/// Drop repeats, keeping the first occurrence's position
pub fn dedup_preserving_order(seeds: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(seeds.len());
    seeds
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}

/// Positional identifiers first, then the file's, deduplicated
pub fn collect(positional: Vec<String>, file: Option<&Path>) -> Result<Vec<String>> {
    let mut seeds: Vec<String> = positional
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(path) = file {
        seeds.extend(read_seed_file(path)?);
    }
    let before = seeds.len();
    let seeds = dedup_preserving_order(seeds);
    if seeds.len() < before {
        log::info!("Dropped {} duplicate seeds", before - seeds.len());
    }
    Ok(seeds)
}
