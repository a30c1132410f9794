//! Scan engine benchmark and equivalence CLI.
//!
//! Build and run:
//! ```bash
//! cargo build --release --bin scan_bench
//! ./target/release/scan_bench --help
//! ./target/release/scan_bench --unit u16 --runs 4096
//! ./target/release/scan_bench --verify --json report.json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use needle_scan::throughput::{self, TextTableSink, ThroughputConfig, ThroughputReport};
use needle_scan::util::env::{parse_u64, SEED_ENV};
use needle_scan::verify::{self, VerifyConfig, VerifyError};
use needle_scan::lanes::LaneKernel;
use needle_scan::{CodeUnit, EngineKind, ScanError};

// ============================================================================
// Argument Parsing
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Unit {
    U8,
    U16,
}

#[derive(Debug)]
struct Args {
    unit: Unit,
    runs: Option<u32>,
    seed: Option<u64>,
    buffers: Option<usize>,
    max_len: Option<usize>,
    needles: Option<String>,
    baseline: EngineKind,
    engines: Option<Vec<EngineKind>>,
    verify: bool,
    verify_only: bool,
    quick: bool,
    json: Option<PathBuf>,
    repro: Option<PathBuf>,
    help: bool,
    verbose: bool,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            unit: Unit::U8,
            runs: None,
            seed: None,
            buffers: None,
            max_len: None,
            needles: None,
            baseline: EngineKind::Scalar,
            engines: None,
            verify: false,
            verify_only: false,
            quick: false,
            json: None,
            repro: None,
            help: false,
            verbose: false,
        }
    }
}

/// Exit with error message.
fn die(msg: &str) -> ! {
    eprintln!("Error: {}", msg);
    eprintln!("Run with --help for usage");
    std::process::exit(2);
}

/// Get next argument value or die.
fn next_value(it: &mut impl Iterator<Item = String>, flag: &str) -> String {
    it.next()
        .unwrap_or_else(|| die(&format!("{} requires a value", flag)))
}

/// Parse a numeric argument or die.
fn parse_num<T: std::str::FromStr>(val: &str, flag: &str) -> T {
    val.parse()
        .unwrap_or_else(|_| die(&format!("Invalid {}: '{}'", flag, val)))
}

fn parse_engine(val: &str) -> EngineKind {
    val.parse().unwrap_or_else(|e| die(&format!("{}", e)))
}

fn parse_args() -> Args {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--help" | "-h" => args.help = true,
            "--verbose" | "-v" => args.verbose = true,
            "--verify" => args.verify = true,
            "--verify-only" => {
                args.verify = true;
                args.verify_only = true;
            }
            "--quick" => args.quick = true,

            "--unit" | "-u" => {
                let val = next_value(&mut it, "--unit");
                args.unit = match val.as_str() {
                    "u8" | "8" => Unit::U8,
                    "u16" | "16" => Unit::U16,
                    _ => die(&format!("Unknown unit: '{}' (expected u8 or u16)", val)),
                };
            }

            "--runs" | "-r" => {
                let val = next_value(&mut it, "--runs");
                let n: u32 = parse_num(&val, "--runs");
                if n == 0 {
                    die("--runs must be >= 1");
                }
                args.runs = Some(n);
            }

            "--seed" | "-s" => {
                let val = next_value(&mut it, "--seed");
                args.seed = Some(
                    parse_u64(&val)
                        .unwrap_or_else(|| die(&format!("Invalid --seed: '{}'", val))),
                );
            }

            "--buffers" => {
                let val = next_value(&mut it, "--buffers");
                args.buffers = Some(parse_num(&val, "--buffers"));
            }

            "--max-len" => {
                let val = next_value(&mut it, "--max-len");
                args.max_len = Some(parse_num(&val, "--max-len"));
            }

            "--needles" | "-n" => {
                let val = next_value(&mut it, "--needles");
                if val.is_empty() {
                    die("--needles must not be empty");
                }
                args.needles = Some(val);
            }

            "--baseline" => {
                let val = next_value(&mut it, "--baseline");
                args.baseline = parse_engine(&val);
            }

            "--engines" | "-e" => {
                let val = next_value(&mut it, "--engines");
                let engines: Vec<EngineKind> = val.split(',').map(|s| parse_engine(s.trim())).collect();
                args.engines = Some(engines);
            }

            "--json" => {
                args.json = Some(PathBuf::from(next_value(&mut it, "--json")));
            }

            "--repro" => {
                args.repro = Some(PathBuf::from(next_value(&mut it, "--repro")));
            }

            other => die(&format!("Unknown argument: '{}'", other)),
        }
    }

    args
}

fn print_help() {
    println!(
        r#"scan_bench: compare multi-needle scan engines

USAGE:
    scan_bench [OPTIONS]

OPTIONS:
    -u, --unit <u8|u16>       Code unit width [default: u8]
    -r, --runs <N>            Timed calls per engine per length bucket
                              [default: 32768, env NEEDLE_SCAN_RUNS]
    -s, --seed <N>            Corpus seed, decimal or 0x-hex [env NEEDLE_SCAN_SEED]
        --buffers <N>         Corpus buffer count [default: 1024]
        --max-len <N>         Longest corpus buffer [default: 1024]
    -n, --needles <CHARS>     Needle characters [default: "[](){{}}"]
    -e, --engines <LIST>      Comma-separated engines to time
                              (scalar, lane-basic, lane-fused) [default: all]
        --baseline <ENGINE>   Engine ratios are relative to [default: scalar]
        --quick               Small corpus and few runs
        --verify              Run the equivalence check before timing
        --verify-only         Run the equivalence check and exit
        --json <PATH>         Write the throughput report as JSON
        --repro <PATH>        Write the minimized repro case here on a violation
    -v, --verbose             Progress on stderr
    -h, --help                Show this help

EXIT STATUS:
    0 on success, 1 on an equivalence violation or I/O failure, 2 on bad arguments."#
    );
}

// ============================================================================
// Driver
// ============================================================================

fn build_configs(args: &Args) -> (ThroughputConfig, VerifyConfig) {
    let mut bench = if args.quick {
        ThroughputConfig::ci_quick()
    } else {
        ThroughputConfig::default()
    }
    .with_env_overrides();

    bench.baseline = args.baseline;
    if let Some(engines) = &args.engines {
        bench.engines = engines.clone();
    }
    if let Some(runs) = args.runs {
        bench.runs_per_bucket = runs;
    }
    if let Some(seed) = args.seed {
        bench.corpus.seed = seed;
    }
    if let Some(buffers) = args.buffers {
        bench.corpus.buffers = buffers;
    }
    if let Some(max_len) = args.max_len {
        bench.corpus.max_len = max_len;
    }
    if let Some(needles) = &args.needles {
        bench.corpus.needles = needles.clone();
    }

    let verify = VerifyConfig {
        corpus: bench.corpus.clone(),
        ..VerifyConfig::default()
    };
    (bench, verify)
}

fn run_verify<T: CodeUnit>(args: &Args, cfg: &VerifyConfig) -> Result<(), ExitCode> {
    if args.verbose {
        eprintln!(
            "[verify] {} buffers up to {} units on {}, seed {:#x}, reference {}",
            cfg.corpus.buffers,
            cfg.corpus.max_len,
            <T::Kernel as LaneKernel>::NAME,
            cfg.corpus.seed,
            cfg.reference
        );
    }
    match verify::verify_corpus::<T>(cfg) {
        Ok(stats) => {
            if args.verbose {
                eprintln!(
                    "[verify] ok: {} buffers, {} requests, {} matches",
                    stats.buffers, stats.requests, stats.matches
                );
            }
            Ok(())
        }
        Err(VerifyError::Config(err)) => die(&format!("{}", err)),
        Err(VerifyError::Violation(violation)) => {
            eprintln!("[verify] FAILED: {}", violation);
            eprintln!("[verify] original request: start {}, count {}, haystack len {}",
                violation.original.start,
                violation.original.count,
                violation.original.haystack.len()
            );
            if let Some(path) = &args.repro {
                match violation.repro.to_json() {
                    Ok(json) => match std::fs::write(path, json) {
                        Ok(()) => eprintln!("[verify] repro case written to {}", path.display()),
                        Err(e) => eprintln!("[verify] failed to write {}: {}", path.display(), e),
                    },
                    Err(e) => eprintln!("[verify] failed to encode repro case: {}", e),
                }
            }
            Err(ExitCode::from(1))
        }
        Err(other) => die(&format!("{}", other)),
    }
}

fn run_bench<T: CodeUnit>(args: &Args, cfg: &ThroughputConfig) -> Result<ThroughputReport, ScanError> {
    if args.verbose {
        eprintln!(
            "[bench] {}-bit units on {}, {} runs per bucket, engines {:?}, baseline {}",
            T::BITS,
            <T::Kernel as LaneKernel>::NAME,
            cfg.runs_per_bucket,
            cfg.engines.iter().map(|k| k.name()).collect::<Vec<_>>(),
            cfg.baseline
        );
    }
    throughput::run::<T>(cfg)
}

fn run<T: CodeUnit>(args: &Args) -> Result<(), ExitCode> {
    let (bench, verify) = build_configs(args);

    if args.verify {
        run_verify::<T>(args, &verify)?;
        if args.verify_only {
            return Ok(());
        }
    }

    let report = run_bench::<T>(args, &bench).unwrap_or_else(|e| die(&format!("{}", e)));

    let stdout = std::io::stdout();
    let mut sink = TextTableSink::new(stdout.lock());
    if let Err(e) = report.write_to(&mut sink) {
        eprintln!("Error: failed to write report: {}", e);
        return Err(ExitCode::from(1));
    }

    if let Some(path) = &args.json {
        let json = match report.to_json() {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Error: failed to encode report: {}", e);
                return Err(ExitCode::from(1));
            }
        };
        if let Err(e) = std::fs::write(path, json) {
            eprintln!("Error: failed to write {}: {}", path.display(), e);
            return Err(ExitCode::from(1));
        }
        if args.verbose {
            eprintln!("[bench] JSON report written to {}", path.display());
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = parse_args();
    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }
    if args.verbose && std::env::var_os(SEED_ENV).is_some() && args.seed.is_some() {
        eprintln!("[bench] --seed overrides {}", SEED_ENV);
    }

    let result = match args.unit {
        Unit::U8 => run::<u8>(&args),
        Unit::U16 => run::<u16>(&args),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}
