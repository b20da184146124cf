//! Catalog summary report
//!
//! A pure function over a catalog snapshot. Burrows with a zero width or
//! zero depth are left out of every figure.

use gophernet_domain::Burrow;
use std::fmt::Write;

/// Report title, first line of every report
pub const REPORT_TITLE: &str = "GopherNet Burrow Report";

/// Figures computed over the burrows that have valid dimensions
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary<'a> {
    /// Sum of depths in meters
    pub total_depth: f64,
    /// Burrows that are neither occupied nor collapsed
    pub available: usize,
    /// First burrow with the strictly largest volume, with that volume
    pub largest: Option<(&'a Burrow, f64)>,
    /// First burrow with the strictly smallest volume, with that volume
    pub smallest: Option<(&'a Burrow, f64)>,
}

impl<'a> ReportSummary<'a> {
    /// Aggregate a catalog snapshot
    ///
    /// Ties keep the earliest burrow in iteration order.
    pub fn from_burrows(burrows: &'a [Burrow]) -> Self {
        let mut total_depth = 0.0;
        let mut available = 0;
        let mut largest: Option<(&Burrow, f64)> = None;
        let mut smallest: Option<(&Burrow, f64)> = None;
        let mut largest_volume = 0.0;
        let mut smallest_volume = f64::INFINITY;

        for burrow in burrows {
            if burrow.width == 0.0 || burrow.depth == 0.0 {
                continue;
            }

            total_depth += burrow.depth;

            if burrow.is_available() {
                available += 1;
            }

            let volume = burrow.volume();
            if volume > largest_volume {
                largest_volume = volume;
                largest = Some((burrow, volume));
            }
            if volume < smallest_volume {
                smallest_volume = volume;
                smallest = Some((burrow, volume));
            }
        }

        Self {
            total_depth,
            available,
            largest,
            smallest,
        }
    }

    /// Render the summary as report text
    pub fn render(&self) -> String {
        let mut report = format!("{REPORT_TITLE}\n\n");

        // Writing to a String cannot fail
        let _ = writeln!(
            report,
            "Total Depth of all Burrows: {:.2} meters",
            self.total_depth
        );
        let _ = writeln!(report, "Number of Available Burrows: {}", self.available);
        write_extremum(&mut report, "Largest", self.largest);
        write_extremum(&mut report, "Smallest", self.smallest);

        report
    }
}

fn write_extremum(report: &mut String, label: &str, extremum: Option<(&Burrow, f64)>) {
    let _ = match extremum {
        Some((burrow, volume)) => writeln!(
            report,
            "{label} Burrow by Volume: {} ({volume:.2} cubic meters)",
            burrow.name
        ),
        None => writeln!(report, "{label} Burrow by Volume: N/A"),
    };
}

/// Format the report for a catalog snapshot
///
/// # Examples
///
/// ```
/// use gophernet_domain::Burrow;
/// use gophernet_service::format_report;
///
/// let report = format_report(&[Burrow::new("Burrow1", 1.5, 1.0, false, 100)]);
/// assert!(report.contains("Total Depth of all Burrows: 1.50 meters"));
/// assert!(report.contains("Largest Burrow by Volume: Burrow1 (1.18 cubic meters)"));
/// ```
pub fn format_report(burrows: &[Burrow]) -> String {
    ReportSummary::from_burrows(burrows).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_burrows() -> Vec<Burrow> {
        vec![
            Burrow::new("Burrow1", 1.5, 1.0, false, 100),
            Burrow::new("Burrow2", 2.0, 1.2, true, 50),
        ]
    }

    #[test]
    fn test_report_content() {
        let report = format_report(&sample_burrows());

        assert!(report.contains("Total Depth of all Burrows: 3.50 meters"));
        assert!(report.contains("Number of Available Burrows: 1"));
        assert!(report.contains("Largest Burrow by Volume: Burrow2 (2.26 cubic meters)"));
        assert!(report.contains("Smallest Burrow by Volume: Burrow1 (1.18 cubic meters)"));
    }

    #[test]
    fn test_report_exact_layout() {
        let report = format_report(&sample_burrows());

        assert_eq!(
            report,
            "GopherNet Burrow Report\n\
             \n\
             Total Depth of all Burrows: 3.50 meters\n\
             Number of Available Burrows: 1\n\
             Largest Burrow by Volume: Burrow2 (2.26 cubic meters)\n\
             Smallest Burrow by Volume: Burrow1 (1.18 cubic meters)\n"
        );
    }

    #[test]
    fn test_empty_catalog() {
        let report = format_report(&[]);

        assert!(report.contains("Total Depth of all Burrows: 0.00 meters"));
        assert!(report.contains("Number of Available Burrows: 0"));
        assert!(report.contains("Largest Burrow by Volume: N/A"));
        assert!(report.contains("Smallest Burrow by Volume: N/A"));
    }

    #[test]
    fn test_skips_invalid_dimensions() {
        let burrows = vec![
            Burrow::new("Flat", 0.0, 1.0, false, 0),
            Burrow::new("Slit", 5.0, 0.0, false, 0),
        ];
        let summary = ReportSummary::from_burrows(&burrows);

        assert_eq!(summary.total_depth, 0.0);
        assert_eq!(summary.available, 0);
        assert!(summary.largest.is_none());
        assert!(summary.smallest.is_none());
    }

    #[test]
    fn test_collapsed_not_available() {
        let burrows = vec![
            Burrow::new("Old", 1.0, 1.0, false, gophernet_domain::COLLAPSE_AGE_MINUTES),
            Burrow::new("New", 1.0, 1.0, false, 0),
        ];

        assert_eq!(ReportSummary::from_burrows(&burrows).available, 1);
    }

    #[test]
    fn test_ties_keep_first() {
        let burrows = vec![
            Burrow::new("First", 1.0, 1.0, false, 0),
            Burrow::new("Second", 1.0, 1.0, false, 0),
        ];
        let summary = ReportSummary::from_burrows(&burrows);

        assert_eq!(summary.largest.map(|(b, _)| b.name.as_str()), Some("First"));
        assert_eq!(summary.smallest.map(|(b, _)| b.name.as_str()), Some("First"));
    }

    #[test]
    fn test_single_burrow_is_both_extrema() {
        let burrows = vec![Burrow::new("Only", 2.0, 2.0, true, 0)];
        let report = format_report(&burrows);

        assert!(report.contains("Largest Burrow by Volume: Only (6.28 cubic meters)"));
        assert!(report.contains("Smallest Burrow by Volume: Only (6.28 cubic meters)"));
    }

    #[test]
    fn test_deterministic() {
        let burrows = sample_burrows();
        assert_eq!(format_report(&burrows), format_report(&burrows.clone()));
    }
}
