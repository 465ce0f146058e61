use std::time::Instant;

use birthday_spacings::{BinPolicy, BirthdaySpacingsTest, SpacingsReport, TestConfig};

use super::CommandResult;

pub struct RunArgs<'a> {
    pub generator: &'a str,
    pub seed: Option<u64>,
    pub bits: u32,
    pub birthdays: usize,
    pub observations: usize,
    pub bin_policy: BinPolicy,
    pub threshold: f64,
    pub output_path: Option<&'a str>,
}

pub fn run(args: RunArgs<'_>) -> CommandResult {
    let generator = super::make_generator(args.generator, args.seed, args.bits)?;
    let config = TestConfig {
        bin_policy: args.bin_policy,
    };
    let mut test = BirthdaySpacingsTest::new(generator, super::year_of(args.bits))?.with_config(config);

    println!(
        "🎂 Birthday spacings: {} birthdays in [0, 2^{}), {} trials, generator={}\n",
        args.birthdays, args.bits, args.observations, args.generator
    );

    let t0 = Instant::now();
    let report = test.run(args.birthdays, args.observations)?;
    let elapsed = t0.elapsed().as_secs_f64();

    print!("{}", render_summary(&report, args.threshold));
    println!("  [{elapsed:.1}s]");

    if let Some(path) = args.output_path {
        write_report(&report, path)?;
        println!("\n📄 Report saved to: {path}");
    }
    Ok(())
}

/// Plain-text summary of a report: lambda, bin table and verdict.
pub fn render_summary(report: &SpacingsReport, threshold: f64) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "  lambda = {}   observed mean = {:.3}   max duplicates = {}\n\n",
        report.lambda,
        report.observed_mean(),
        report.max_duplicates
    ));
    out.push_str(&format!("  bins: {}\n", report.histogram.policy));
    out.push_str(&format!(
        "  {:<8} {:>10} {:>12}\n",
        "dups", "observed", "expected"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(32)));
    for bin in &report.histogram.bins {
        out.push_str(&format!(
            "  {:<8} {:>10} {:>12.2}\n",
            bin.label(),
            bin.observed,
            bin.expected
        ));
    }
    let verdict = if report.passed(threshold) {
        "PASS"
    } else {
        "FAIL"
    };
    out.push_str(&format!(
        "\n  chi2 = {:.4}   dof = {}   p = {:.6}\n  grade {}: {verdict} (threshold {threshold})\n",
        report.statistic,
        report.degrees_of_freedom,
        report.p_value,
        report.grade()
    ));
    out
}

/// Write the report as pretty-printed JSON.
pub fn write_report(report: &SpacingsReport, path: &str) -> CommandResult {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}
