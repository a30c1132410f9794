#![no_main]

use libfuzzer_sys::fuzz_target;

use needle_scan::verify::Differential;
use needle_scan::{EngineKind, NeedleSet, ScalarEngine, NEEDLES_MAX};

// Runs every lane engine against the scalar engine on one request.
//
// Byte layout:
// - Byte 0 → needle count (mod NEEDLES_MAX + 1)
// - Byte 1 → start, Byte 2 → count (both taken modulo the haystack size
//   so most requests are in range; out-of-range ones check error parity)
// - Byte 3 → bit 0 selects 16-bit units
// - Next `needle count` bytes (or byte pairs) → needles
// - Rest → haystack
fuzz_target!(|data: &[u8]| {
    if data.len() < 4 {
        return;
    }
    let needle_count = data[0] as usize % (NEEDLES_MAX + 1);
    let wide = data[3] & 1 == 1;
    let rest = &data[4..];

    if wide {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|p| u16::from_le_bytes([p[0], p[1]]))
            .collect();
        check(&units, needle_count, data[1], data[2]);
    } else {
        check(rest, needle_count, data[1], data[2]);
    }
});

fn check<T: needle_scan::CodeUnit>(units: &[T], needle_count: usize, start: u8, count: u8) {
    let split = needle_count.min(units.len());
    let (needles, haystack) = units.split_at(split);
    let Ok(needles) = NeedleSet::new(needles) else {
        return;
    };

    let start = start as usize % (haystack.len() + 2);
    let count = count as usize % (haystack.len() + 2);

    let candidates = vec![
        EngineKind::LaneBasic.engine::<T>(),
        EngineKind::LaneFused.engine::<T>(),
    ];
    let diff = Differential::new(&ScalarEngine, candidates);
    if let Err((engine, mismatch)) = diff.check_request(haystack, &needles, start, count) {
        panic!(
            "{} disagrees with scalar: {mismatch} (start {start}, count {count}, len {})",
            engine.name(),
            haystack.len()
        );
    }
}
