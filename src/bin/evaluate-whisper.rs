
use ::whisper::*;
use itertools::Itertools;
use rand::Rng;
use std::collections::BTreeMap;
use std::time::Instant;

// Formula computing the complement of the most recent history bit: with an
// alternating branch as the only contributor to its thread's history, this
// predicts the alternation exactly.
//
//   u0 = b1 | !b0      u1 = b3 | b2       u2 = u1 & !u0
//   u3 = b5 & b4       u4 = b7 & b6       u5 = u4 | u3
//   u6 = u5 | u2       result = !u6 = !b0 (for alternating histories)
const ALTERNATOR: u16 = 0x045e;

const ITERS: usize = 4000;

fn build_fallback() -> PhtPredictor {
    PhtConfig { size: 1 << 12 }.build()
}

#[derive(Clone, Copy, Debug, Default)]
struct SiteStats {
    hits: usize,
    events: usize,
}

fn run_branch(
    whisper: &mut WhisperPredictor,
    stats: &mut BTreeMap<usize, SiteStats>,
    tid: ThreadId,
    pc: usize,
    outcome: Outcome,
) {
    let mut bp_history = None;
    let prediction = whisper.lookup(tid, pc, &mut bp_history);
    whisper.update_histories(tid, pc, false, outcome, pc + 4,
        &mut bp_history);
    whisper.update(tid, pc, outcome, &mut bp_history, false,
        BranchKind::Conditional, pc + 4);

    let site = stats.entry(pc).or_default();
    site.events += 1;
    if prediction == outcome {
        site.hits += 1;
    }
}

fn main() {
    let mut whisper = WhisperConfig { hint_buffer_size: 32 }
        .build(Box::new(build_fallback()));

    println!("[*] Whisper configuration:");
    println!("      Hint buffer capacity: {}",
        whisper.hint_buffer.capacity());
    println!("      Fallback: PHT, {} two-bit counters", 1 << 12);

    // Thread 0 runs a heavily-taken loop branch, a never-taken guard, and
    // an un-hinted noisy branch; thread 1 runs a strictly alternating
    // branch covered by a formula hint.
    whisper.insert(0x1000, Hint::encode(0, 0, 0b11, 0x080)); // 0x1080
    whisper.insert(0x1004, Hint::encode(0, 0, 0b00, 0x09c)); // 0x10a0
    whisper.insert(0x1008, Hint::encode(0, ALTERNATOR, 0b01, 0x0b8)); // 0x10c0
    println!("      Hints planted: {}", whisper.hint_buffer.len());

    let mut rng = rand::thread_rng();
    let mut stats: BTreeMap<usize, SiteStats> = BTreeMap::new();
    let mut alternating = Outcome::N;

    let start = Instant::now();
    for iter in 0..ITERS {
        // Loop back-edge: taken except once every 64 iterations
        let loop_outcome = Outcome::from_bool(iter % 64 != 63);
        run_branch(&mut whisper, &mut stats, 0, 0x1080, loop_outcome);

        // Guard that never fires
        run_branch(&mut whisper, &mut stats, 0, 0x10a0, Outcome::N);

        // Data-dependent branch, no hint: the fallback earns its keep
        let noisy = Outcome::from_bool(rng.gen_bool(0.7));
        run_branch(&mut whisper, &mut stats, 0, 0x10e0, noisy);

        // Strict alternation on its own thread
        alternating = !alternating;
        run_branch(&mut whisper, &mut stats, 1, 0x10c0, alternating);
    }
    let done = start.elapsed();
    println!("[*] ... simulated {} branch events in {:.3?}",
        ITERS * 4, done);
    println!();

    println!("[*] Per-site statistics:");
    let site_iter = stats.iter()
        .sorted_by_key(|(_, s)| s.events - s.hits);
    for (pc, site) in site_iter {
        let rate = site.hits as f64 / site.events as f64;
        println!("      {:#010x}  {:5}/{:5} ({:.2}% correct)",
            pc, site.hits, site.events, rate * 100.0);
    }
    println!();

    println!("[*] Whisper statistics:");
    println!("      Hint predictions: {} ({} bias, {} formula)",
        whisper.stat.hint_predictions,
        whisper.stat.bias_predictions,
        whisper.stat.formula_predictions,
    );
    println!("      Declined (unimplemented history length): {}",
        whisper.stat.declined);
    println!("      Fallback lookups: {}", whisper.stat.fallback_lookups);
    println!("      Hint agreement at commit: {}/{}",
        whisper.stat.hint_correct,
        whisper.stat.hint_correct + whisper.stat.hint_incorrect,
    );
}
