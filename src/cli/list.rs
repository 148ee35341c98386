//! List command implementation

use serde::Serialize;
use std::process::ExitCode;

use crate::registry::{all_algorithms, capabilities, Algorithm, Backend, ScaleSupport};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Scale support as emitted in JSON output
#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub(crate) enum SupportEntry {
    Fixed { scales: Vec<f32> },
    Arbitrary { min: f32, max: f32 },
    Unavailable,
}

impl From<ScaleSupport> for SupportEntry {
    fn from(support: ScaleSupport) -> Self {
        match support {
            ScaleSupport::Arbitrary { min, max } => SupportEntry::Arbitrary { min, max },
            ScaleSupport::Fixed([]) => SupportEntry::Unavailable,
            ScaleSupport::Fixed(scales) => SupportEntry::Fixed { scales: scales.to_vec() },
        }
    }
}

/// One row of `pxscale list --json`
#[derive(Debug, Serialize)]
pub(crate) struct ListEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub accelerated: bool,
    pub cpu: SupportEntry,
    pub raster: SupportEntry,
}

impl ListEntry {
    pub fn new(algorithm: Algorithm) -> Self {
        let d = capabilities(algorithm);
        ListEntry {
            id: algorithm.id(),
            name: d.name,
            description: d.description,
            accelerated: d.accelerated,
            cpu: d.cpu.into(),
            raster: d.raster.into(),
        }
    }
}

/// Algorithms matching the filters, in catalogue order.
pub(crate) fn matching(scale: Option<f32>, backend: Option<Backend>) -> Vec<Algorithm> {
    let backends: &[Backend] = match &backend {
        Some(b) => std::slice::from_ref(b),
        None => &Backend::ALL,
    };
    all_algorithms()
        .iter()
        .copied()
        .filter(|&a| {
            backends.iter().any(|&b| {
                let support = capabilities(a).support(b);
                match scale {
                    Some(s) => support.contains(s),
                    None => support.is_available(),
                }
            })
        })
        .collect()
}

/// Execute the list command
pub fn run_list(scale: Option<f32>, backend: Option<Backend>, json: bool) -> ExitCode {
    if let Some(s) = scale {
        if !s.is_finite() || s <= 0.0 {
            eprintln!("Error: --scale must be a positive number, got {}", s);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    let algorithms = matching(scale, backend);

    if json {
        let entries: Vec<ListEntry> = algorithms.into_iter().map(ListEntry::new).collect();
        match serde_json::to_string_pretty(&entries) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    if algorithms.is_empty() {
        println!("No algorithms match.");
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("{:<12} {:<12} {:<16} {:<16} DESCRIPTION", "ID", "NAME", "CPU", "RASTER");
    for algorithm in algorithms {
        let d = capabilities(algorithm);
        println!(
            "{:<12} {:<12} {:<16} {:<16} {}",
            algorithm.id(),
            d.name,
            d.cpu.to_string(),
            d.raster.to_string(),
            d.description
        );
    }
    ExitCode::from(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_without_filters_lists_everything() {
        assert_eq!(matching(None, None).len(), 12);
    }

    #[test]
    fn test_matching_by_scale_and_backend() {
        let at3_raster = matching(Some(3.0), Some(Backend::Raster));
        assert!(at3_raster.contains(&Algorithm::Scale));
        assert!(at3_raster.contains(&Algorithm::OmniScale));
        assert!(!at3_raster.contains(&Algorithm::Hq));
        assert!(!at3_raster.contains(&Algorithm::Epx));

        let at3_any = matching(Some(3.0), None);
        assert!(at3_any.contains(&Algorithm::Hq));
    }

    #[test]
    fn test_raster_listing_skips_unavailable() {
        let raster = matching(None, Some(Backend::Raster));
        assert!(!raster.contains(&Algorithm::Trilinear));
        assert!(!raster.contains(&Algorithm::Xbr));
    }

    #[test]
    fn test_json_entry_shape() {
        let entry = ListEntry::new(Algorithm::Hq);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["id"], "hq");
        assert_eq!(value["cpu"]["kind"], "fixed");
        assert_eq!(value["cpu"]["scales"], serde_json::json!([2.0, 3.0, 4.0]));
        assert_eq!(value["raster"]["kind"], "unavailable");

        let omni = serde_json::to_value(ListEntry::new(Algorithm::OmniScale)).unwrap();
        assert_eq!(omni["raster"]["kind"], "arbitrary");
        assert_eq!(omni["raster"]["max"], 8.0);
    }
}
