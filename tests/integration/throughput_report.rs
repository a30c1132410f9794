//! Throughput harness: report shape, sinks and JSON output.

use needle_scan::lanes::{LaneKernel, NativeU16, NativeU8};
use needle_scan::throughput::{self, ThroughputConfig, VecSink};
use needle_scan::verify::{self, CorpusConfig};
use needle_scan::{EngineKind, TextTableSink};

fn tiny_config() -> ThroughputConfig {
    ThroughputConfig {
        buckets: vec![16, 64, 256],
        runs_per_bucket: 8,
        engines: vec![EngineKind::LaneFused, EngineKind::LaneBasic],
        baseline: EngineKind::Scalar,
        corpus: CorpusConfig {
            buffers: 30,
            max_len: 200,
            ..CorpusConfig::default()
        },
    }
}

#[test]
fn report_covers_every_bucket_and_engine() {
    let cfg = tiny_config();
    let report = throughput::run::<u8>(&cfg).unwrap();

    assert_eq!(report.unit_bits, 8);
    assert_eq!(report.kernel, NativeU8::NAME);
    assert_eq!(report.baseline, "scalar");
    assert_eq!(report.engines, vec!["lane-fused", "lane-basic", "scalar"]);
    assert_eq!(report.seed, cfg.corpus.seed);
    assert_eq!(report.buckets.len(), 3);
    assert_eq!(
        report.buckets.iter().map(|b| b.buffers).sum::<usize>(),
        30,
        "every buffer up to 200 units lands in a bucket"
    );

    for bucket in &report.buckets {
        assert_eq!(bucket.timings.len(), 3);
        assert_eq!(bucket.calls, if bucket.buffers == 0 { 0 } else { 8 });
        // All engines scan the same buffers and must find the same matches.
        let matches = bucket.timings[0].matches;
        assert!(bucket.timings.iter().all(|t| t.matches == matches));
        let baseline = &bucket.timings[2];
        if baseline.elapsed_ns != 0 {
            assert_eq!(baseline.ratio, Some(1.0));
        }
    }
}

#[test]
fn utf16_run_reports_width() {
    let report = throughput::run::<u16>(&tiny_config()).unwrap();
    assert_eq!(report.unit_bits, 16);
    assert_eq!(report.kernel, NativeU16::NAME);
    assert!(report.buckets.iter().any(|b| b.calls > 0));
}

#[test]
fn run_on_accepts_a_prepared_corpus() {
    let cfg = tiny_config();
    let corpus = verify::generate::<u8>(&cfg.corpus);
    let report = throughput::run_on(&cfg, &corpus).unwrap();
    assert_eq!(report.buckets.len(), cfg.buckets.len());
}

#[test]
fn too_many_corpus_needles_is_an_error() {
    let mut cfg = tiny_config();
    cfg.corpus.needles = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJ".to_string();
    assert!(throughput::run::<u8>(&cfg).is_err());
}

#[test]
fn rows_feed_any_sink() {
    let report = throughput::run::<u8>(&tiny_config()).unwrap();

    let mut rows = VecSink::default();
    report.write_to(&mut rows).unwrap();
    assert_eq!(rows.rows, report.rows());
    assert_eq!(rows.rows.len(), 4);
    assert_eq!(
        rows.rows[0],
        vec![
            "len<=",
            "buffers",
            "lane-fused ns",
            "lane-fused/scalar",
            "lane-basic ns",
            "lane-basic/scalar",
            "scalar ns",
            "scalar/scalar",
        ]
    );

    let mut table = TextTableSink::with_width(Vec::new(), 18);
    report.write_to(&mut table).unwrap();
    let text = String::from_utf8(table.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].trim_start().starts_with("len<="));
    assert!(lines.iter().all(|l| l.len() == lines[0].len()));
}

#[test]
fn json_report_parses_back() {
    let report = throughput::run::<u8>(&tiny_config()).unwrap();
    let json = report.to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["unit_bits"], 8);
    assert_eq!(value["baseline"], "scalar");
    assert_eq!(value["kernel"], NativeU8::NAME);
    assert_eq!(value["buckets"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["buckets"][0]["timings"][2]["engine"], "scalar");
}

#[test]
fn quick_config_is_small() {
    let quick = ThroughputConfig::ci_quick();
    let full = ThroughputConfig::default();
    assert!(quick.runs_per_bucket < full.runs_per_bucket);
    assert!(quick.corpus.buffers < full.corpus.buffers);
    assert_eq!(quick.buckets, full.buckets);
}
