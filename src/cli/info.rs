//! Info command implementation

use serde::Serialize;
use std::process::ExitCode;

use crate::registry::{capabilities, recommend_backend, Algorithm, Backend, Recommendation};

use super::list::ListEntry;
use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Source sizes used to illustrate backend recommendations
const SAMPLE_SIZES: [(u32, u32); 3] = [(32, 32), (256, 256), (1024, 1024)];

#[derive(Debug, Serialize)]
struct RecommendationRow {
    scale: f32,
    width: u32,
    height: u32,
    backend: Recommendation,
}

#[derive(Debug, Serialize)]
struct InfoReport {
    #[serde(flatten)]
    entry: ListEntry,
    recommendations: Vec<RecommendationRow>,
}

/// Factors worth showing a recommendation for.
fn sample_scales(algorithm: Algorithm) -> Vec<f32> {
    let d = capabilities(algorithm);
    let mut scales: Vec<f32> = Backend::ALL
        .iter()
        .flat_map(|&b| d.support(b).scales().iter().copied())
        .collect();
    if d.cpu.is_arbitrary() || d.raster.is_arbitrary() {
        scales.extend([2.0, 2.5, 4.0]);
    }
    scales.sort_by(f32::total_cmp);
    scales.dedup();
    scales.retain(|&s| d.cpu.contains(s) || d.raster.contains(s));
    scales
}

fn recommendations(algorithm: Algorithm) -> Vec<RecommendationRow> {
    sample_scales(algorithm)
        .into_iter()
        .flat_map(|scale| {
            SAMPLE_SIZES.iter().map(move |&(width, height)| RecommendationRow {
                scale,
                width,
                height,
                backend: recommend_backend(algorithm, scale, width, height),
            })
        })
        .collect()
}

/// Execute the info command
pub fn run_info(name: &str, json: bool) -> ExitCode {
    let algorithm: Algorithm = match name.parse() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    if json {
        let report = InfoReport {
            entry: ListEntry::new(algorithm),
            recommendations: recommendations(algorithm),
        };
        return match serde_json::to_string_pretty(&report) {
            Ok(s) => {
                println!("{}", s);
                ExitCode::from(EXIT_SUCCESS)
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_ERROR)
            }
        };
    }

    let d = capabilities(algorithm);
    println!("{} ({})", d.name, algorithm.id());
    println!("  {}", d.description);
    println!();
    println!("  cpu:         {}", d.cpu);
    println!("  raster:      {}", d.raster);
    println!("  accelerated: {}", if d.accelerated { "yes" } else { "no" });

    let rows = recommendations(algorithm);
    if !rows.is_empty() {
        println!();
        println!("Recommended backend:");
        for row in rows {
            println!("  {}x on {}x{}: {}", row.scale, row.width, row.height, row.backend);
        }
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_scales_fixed() {
        assert_eq!(sample_scales(Algorithm::Hq), vec![2.0, 3.0, 4.0]);
        assert_eq!(sample_scales(Algorithm::Eagle), vec![2.0]);
    }

    #[test]
    fn test_sample_scales_arbitrary() {
        assert_eq!(sample_scales(Algorithm::OmniScale), vec![2.0, 2.5, 4.0]);
    }

    #[test]
    fn test_recommendations_follow_registry() {
        let rows = recommendations(Algorithm::Scale);
        assert_eq!(rows.len(), 9);
        let small = &rows[0];
        assert_eq!((small.scale, small.width), (2.0, 32));
        assert_eq!(small.backend, Recommendation::Cpu);
        assert!(rows.iter().any(|r| r.backend == Recommendation::Raster));

        assert!(recommendations(Algorithm::Xbr).iter().all(|r| r.backend == Recommendation::Cpu));
    }
}
