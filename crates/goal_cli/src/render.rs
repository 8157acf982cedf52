//! Plain-text rendering of command results.

use crate::commands::HalvesReport;
use goal_core::analysis::{HomeAwayComparison, IntervalMatrix, PeriodRates, RateSummary};
use goal_core::stats::DEFAULT_ALPHA;
use goal_core::{Histogram, TestOutcome};
use std::fmt::Write;

const BAR_WIDTH: f64 = 40.0;

fn rate(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.3}", v))
}

fn verdict(outcome: &TestOutcome) -> &'static str {
    if outcome.is_significant(DEFAULT_ALPHA) {
        "significant"
    } else {
        "not significant"
    }
}

fn test_line(out: &mut String, name: &str, label: &str, outcome: &TestOutcome) {
    let _ = writeln!(
        out,
        "{:<28} {} = {:>8.4}   p = {:.4e}  ({})",
        name,
        label,
        outcome.statistic,
        outcome.p_value,
        verdict(outcome)
    );
}

fn period_rates(out: &mut String, title: &str, rates: &PeriodRates) {
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "  matches:            {}", rates.matches);
    let _ = writeln!(out, "  goals:              {}", rates.goals);
    let _ = writeln!(out, "  goals per match:    {}", rate(rates.per_match));
    let _ = writeln!(out, "  per 1st half:       {}", rate(rates.first_half));
    let _ = writeln!(out, "  per 2nd half:       {}", rate(rates.second_half));
}

pub fn summary(summary: &RateSummary) -> String {
    let mut out = String::new();
    match summary {
        RateSummary::League(rates) => period_rates(&mut out, "League matches", rates),
        RateSummary::Tournament(t) => {
            period_rates(&mut out, "Group-stage matches", &t.group);
            out.push('\n');
            period_rates(&mut out, "Knockout matches", &t.knockout);
            let _ = writeln!(
                out,
                "  per extra time:     {}  ({} goals, {} matches)",
                rate(t.extra_time_per_match),
                t.extra_time_goals,
                t.extra_time_matches
            );
            out.push_str("\nGoals by stage\n");
            for (stage, goals) in &t.goals_by_stage {
                let _ = writeln!(out, "  {:<24} {}", stage, goals);
            }
        }
    }
    out
}

pub fn home_away(result: &HomeAwayComparison) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Home {} / away {} goals over {} matches ({} unattributed)",
        result.home_goals, result.away_goals, result.matches, result.unattributed_goals
    );
    let _ = writeln!(
        out,
        "Late goals (90'+): home {} / away {}\n",
        result.late_home_goals, result.late_away_goals
    );
    test_line(&mut out, "Goal timing (KS)", "D", &result.timing);
    test_line(&mut out, "Goals per match (Poisson)", "z", &result.rate);
    test_line(&mut out, "Late goals (Poisson)", "z", &result.late_rate);
    out
}

fn matrix(out: &mut String, title: &str, matrix: &IntervalMatrix) {
    let _ = writeln!(out, "\n{}", title);
    let _ = write!(out, "{:>9}", "");
    for (start, end) in &matrix.intervals {
        let _ = write!(out, "{:>9}", format!("{}-{}", start, end));
    }
    out.push('\n');
    for (j, row) in matrix.p_values.iter().enumerate() {
        let (start, end) = matrix.intervals[j];
        let _ = write!(out, "{:>9}", format!("{}-{}", start, end));
        for p in row {
            match p {
                Some(p) => {
                    let _ = write!(out, "{:>9.3}", p);
                }
                None => {
                    let _ = write!(out, "{:>9}", "");
                }
            }
        }
        out.push('\n');
    }
    let counts: Vec<String> = matrix.counts.iter().map(|c| c.to_string()).collect();
    let _ = writeln!(out, "goals per interval: {}", counts.join(" "));
}

pub fn halves(report: &HalvesReport) -> String {
    let mut out = String::new();
    let c = &report.comparison;
    let _ = writeln!(
        out,
        "1st half {} / 2nd half {} goals over {} matches (stoppage time excluded)\n",
        c.first_half_goals, c.second_half_goals, c.matches
    );
    test_line(&mut out, "Goals per half (Poisson)", "z", &c.rate);
    test_line(&mut out, "Minute in half (MWU)", "U", &c.rank_sum);
    test_line(&mut out, "Minute in half (KS)", "D", &c.distribution);
    matrix(&mut out, "1st half interval p-values", &report.first_half);
    matrix(&mut out, "2nd half interval p-values", &report.second_half);
    out
}

pub fn histogram(hist: &Histogram) -> String {
    let mut out = String::new();
    let max = hist.values.iter().cloned().fold(0.0, f64::max);
    let precision = if hist.weighting.is_rate() { 4 } else { 0 };
    for (label, value) in hist.labels.iter().zip(&hist.values) {
        let bar = if max > 0.0 {
            "#".repeat((value / max * BAR_WIDTH).round() as usize)
        } else {
            String::new()
        };
        let _ = writeln!(out, "{:>10} {:>9.*} {}", label, precision, value, bar);
    }
    let _ = writeln!(out, "{:>10} {:>9.*}", "total", precision, hist.total());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use goal_core::histogram::Weighting;

    #[test]
    fn test_histogram_bars() {
        let hist = Histogram {
            edges: vec![0.0, 15.0, 30.0],
            labels: vec!["0 - 15".to_string(), "15 - 30".to_string()],
            values: vec![4.0, 2.0],
            weighting: Weighting::Unweighted,
            dropped: 0,
        };
        let text = histogram(&hist);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(&"#".repeat(40)));
        assert!(lines[1].ends_with(&format!(" {}", "#".repeat(20))));
        assert!(lines[2].contains("total"));
    }

    #[test]
    fn test_rate_formatting() {
        assert_eq!(rate(Some(1.5)), "1.500");
        assert_eq!(rate(None), "-");
    }
}
