//! Domain Sweep - bulk RDAP domain availability checking
//!
//! Builds candidate domains from a word list or manual names, checks each one
//! against its registry's RDAP server, and writes the available ones to a file.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::{ArgAction, Parser};
use indicatif::{ProgressBar, ProgressStyle};

use domain_sweep::{
    candidates::{self, CandidateBuilder, LengthFilter},
    logging::Logging,
    report,
    sweep::{SweepEvent, SweepReport, Sweeper},
    EndpointTable, ProbeConfig, Result, SweepConfig, SweepError,
};

#[derive(Parser, Debug)]
#[command(name = "domain-sweep", version, about = "Bulk RDAP domain availability checker", long_about = None)]
struct Args {
    /// Base names or full domains to check, comma or space separated
    #[arg(short, long, env = "DOMAIN_SWEEP_NAMES")]
    names: Option<String>,

    /// Dictionary file with one word per line (e.g. /usr/share/dict/words)
    #[arg(short, long, value_name = "FILE", env = "DOMAIN_SWEEP_DICTIONARY")]
    dictionary: Option<PathBuf>,

    /// Only use dictionary words of exactly this length
    #[arg(short, long, value_name = "N")]
    length: Option<usize>,

    /// Minimum dictionary word length
    #[arg(long, value_name = "N", conflicts_with = "length")]
    min_length: Option<usize>,

    /// Maximum dictionary word length
    #[arg(long, value_name = "N", conflicts_with = "length")]
    max_length: Option<usize>,

    /// Prefixes tried in front of each name [default: try,get,use,my,the]
    #[arg(long, value_delimiter = ',', env = "DOMAIN_SWEEP_PREFIXES")]
    prefixes: Option<Vec<String>>,

    /// Check bare names only
    #[arg(long, conflicts_with = "prefixes")]
    no_prefixes: bool,

    /// TLDs to check
    #[arg(short, long, value_delimiter = ',', default_value = "com,ai,dev", env = "DOMAIN_SWEEP_TLDS")]
    tlds: Vec<String>,

    /// Randomize the order of candidates
    #[arg(long)]
    shuffle: bool,

    /// Number of parallel workers
    #[arg(short, long, default_value_t = 10, env = "DOMAIN_SWEEP_WORKERS")]
    workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10, value_name = "SECS", env = "DOMAIN_SWEEP_TIMEOUT")]
    timeout: u64,

    /// How long to wait for one check before skipping it, in seconds
    #[arg(long, default_value_t = 30, value_name = "SECS", env = "DOMAIN_SWEEP_TASK_TIMEOUT")]
    task_timeout: u64,

    /// Pause briefly after every request, not only after rate limiting
    #[arg(long)]
    pace: bool,

    /// Override or add an RDAP endpoint, e.g. `ai=https://rdap.nic.ai/domain/{}`
    #[arg(long = "endpoint", value_name = "SUFFIX=TEMPLATE", value_parser = parse_endpoint)]
    endpoints: Vec<(String, String)>,

    /// Fallback RDAP template for suffixes without a dedicated endpoint
    #[arg(long, value_name = "TEMPLATE", value_parser = parse_template)]
    bootstrap: Option<String>,

    /// Output file for available domains
    #[arg(short, long, default_value = "available_domains.txt", env = "DOMAIN_SWEEP_OUTPUT")]
    output: PathBuf,

    /// Print the full report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_template(s: &str) -> std::result::Result<String, String> {
    if s.contains("{}") {
        Ok(s.to_string())
    } else {
        Err(format!("template '{}' must contain a {{}} placeholder", s))
    }
}

fn parse_endpoint(s: &str) -> std::result::Result<(String, String), String> {
    let (suffix, template) = s
        .split_once('=')
        .ok_or_else(|| format!("expected SUFFIX=TEMPLATE, got '{}'", s))?;
    let suffix = suffix.trim().trim_start_matches('.').to_lowercase();
    if suffix.is_empty() {
        return Err(format!("missing suffix in '{}'", s));
    }
    Ok((suffix, parse_template(template.trim())?))
}

#[tokio::main]
async fn main() {
    // Initialize the library
    if let Err(e) = domain_sweep::init() {
        eprintln!("❌ Failed to initialize: {}", e);
        process::exit(1);
    }

    let args = Args::parse();

    if let Err(e) = Logging::new(args.verbose, std::io::stderr().is_terminal()).start() {
        eprintln!("{}", e.user_message());
        process::exit(1);
    }

    if let Err(e) = run(args).await {
        if e.is_fatal() {
            tracing::error!(error = %e, "Sweep aborted");
        }
        eprintln!("{}", e.user_message());
        process::exit(exit_code(&e));
    }
}

/// 2 when a running sweep was aborted, 1 for every other failure
fn exit_code(err: &SweepError) -> i32 {
    if err.is_fatal() {
        2
    } else {
        1
    }
}

async fn run(args: Args) -> Result<()> {
    let (names, source) = collect_names(&args)?;

    let mut builder = CandidateBuilder::new()
        .names(names)
        .tlds(args.tlds.iter().cloned())
        .shuffle(args.shuffle);
    if args.no_prefixes {
        builder = builder.prefixes(Vec::<String>::new());
    } else if let Some(prefixes) = &args.prefixes {
        builder = builder.prefixes(prefixes.iter().cloned());
    }
    let candidates = builder.build()?;

    let probe_config = ProbeConfig {
        timeout: Duration::from_secs(args.timeout),
        ..Default::default()
    };
    let sweep_config = SweepConfig {
        workers: args.workers,
        task_timeout: Duration::from_secs(args.task_timeout),
        pace: args.pace,
        ..Default::default()
    };

    let mut endpoints = EndpointTable::default();
    for (suffix, template) in &args.endpoints {
        endpoints = endpoints.with_endpoint(suffix, template.clone());
    }
    if let Some(bootstrap) = &args.bootstrap {
        endpoints = endpoints.with_bootstrap(bootstrap.clone());
    }

    let sweeper = Sweeper::rdap(probe_config, endpoints, sweep_config)?;

    if !args.json {
        println!("🔍 Checking {} candidate domains from {} with {} workers...", candidates.len(), source, args.workers);
    }

    let progress = progress_bar(candidates.len() as u64, args.json)?;
    let report = sweeper
        .run_with_observer(candidates, |event| {
            progress.inc(1);
            match event {
                SweepEvent::Checked(result) if result.is_available() => {
                    progress.println(format!("✨🟢 AVAILABLE: {} 🟢✨", result.candidate));
                }
                SweepEvent::Skipped { candidate, reason } => {
                    progress.println(format!("⚠️  SKIPPED: {} ({})", candidate, reason));
                }
                SweepEvent::Checked(_) => {}
            }
        })
        .await?;
    progress.finish_and_clear();

    report::write_text(&report, &args.output, &source)?;

    if args.json {
        println!("{}", report::to_json(&report)?);
    } else {
        print_summary(&report);
        println!("📝 Results written to {}", args.output.display());
    }

    Ok(())
}

/// Gather base names from the manual list and/or dictionary, with a
/// human-readable description of where they came from.
fn collect_names(args: &Args) -> Result<(Vec<String>, String)> {
    let mut names = Vec::new();
    let mut sources = Vec::new();

    if let Some(list) = &args.names {
        let parsed = candidates::parse_list(list);
        sources.push(format!("{} listed names", parsed.len()));
        names.extend(parsed);
    }

    if let Some(path) = &args.dictionary {
        let filter = LengthFilter::from_bounds(args.length, args.min_length, args.max_length)?;
        let words = candidates::load_dictionary(path, filter)?;
        sources.push(format!("{} ({} words)", path.display(), words.len()));
        names.extend(words);
    }

    if sources.is_empty() {
        return Err(SweepError::config(
            "no candidate source given; use --names and/or --dictionary",
        ));
    }

    Ok((names, sources.join(" and ")))
}

fn progress_bar(len: u64, hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    )
    .map_err(|e| SweepError::internal(format!("Invalid progress template: {}", e)))?
    .progress_chars("=>-");

    let bar = ProgressBar::new(len);
    bar.set_style(style);
    bar.set_message("checking");
    Ok(bar)
}

fn print_summary(report: &SweepReport) {
    println!();
    println!("--- Summary ---");
    if report.available.is_empty() {
        println!("😔 No available domains found.");
    } else {
        println!("🎉 Available Domains ({}):", report.available_count());
        for domain in &report.available {
            println!("  - {}", domain);
        }
    }
    println!();
    println!("📈 Totals:");
    println!("   📊 Checked: {}", report.checked);
    println!("   ✅ Available: {}", report.available_count());
    println!("   ❌ Taken: {}", report.unavailable);
    if report.indeterminate > 0 {
        println!("   ⚠️  Inconclusive: {} ({} rate limited)", report.indeterminate, report.rate_limited);
    }
    if !report.skipped.is_empty() {
        println!("   ⏭️  Skipped: {}", report.skipped.len());
    }
    println!("   ⏱️  Total time: {:.2}s", report.elapsed_ms as f64 / 1000.0);
}
