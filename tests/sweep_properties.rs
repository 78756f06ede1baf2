//! Property tests for the chromosome sweep.
//!
//! Random sorted inputs are swept and compared against a brute-force count,
//! and the indexed sweep is compared against the streaming sweep.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use chromsweep::bed::{parse_records, BedReader};
use chromsweep::commands::CountCommand;
use chromsweep::config::{natural_cmp, ChromOrder};
use chromsweep::index::{index_path, ChromIndex};
use chromsweep::interval::BedRecord;
use chromsweep::sweep::{count_overlaps_naive, SweepEngine};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// Generate `n` random intervals over `chroms`, sorted under `order`.
fn random_sorted(rng: &mut SmallRng, chroms: &[&str], n: usize, order: ChromOrder) -> String {
    let mut intervals: Vec<(String, u64, u64)> = (0..n)
        .map(|_| {
            let chrom = chroms[rng.gen_range(0..chroms.len())].to_string();
            let start = rng.gen_range(0..2_000u64);
            let len = rng.gen_range(1..150u64);
            (chrom, start, start + len)
        })
        .collect();

    intervals.sort_by(|a, b| {
        order
            .compare(&a.0, &b.0)
            .then(a.1.cmp(&b.1))
            .then(a.2.cmp(&b.2))
    });

    intervals
        .iter()
        .map(|(c, s, e)| format!("{}\t{}\t{}\n", c, s, e))
        .collect()
}

fn sweep(order: ChromOrder, query: &str, database: &str) -> Vec<usize> {
    let mut counts: Vec<usize> = Vec::new();
    SweepEngine::with_order(order)
        .run(
            BedReader::new(query.as_bytes()),
            BedReader::new(database.as_bytes()),
            &mut counts,
        )
        .unwrap();
    counts
}

fn naive(query: &str, database: &str) -> Vec<usize> {
    let q = parse_records(query).unwrap();
    let d = parse_records(database).unwrap();
    count_overlaps_naive(&q, &d)
}

fn write_bed(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn count_file(cmd: &CountCommand, query: &Path, database: &Path) -> String {
    let mut output = Vec::new();
    cmd.run(query, database, &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

// =============================================================================
// Streaming sweep vs brute force
// =============================================================================

#[test]
fn test_sweep_matches_brute_force_lexicographic() {
    let mut rng = SmallRng::seed_from_u64(7);
    let chroms = ["chr1", "chr10", "chr2", "chr3", "chrX"];

    for round in 0..200 {
        // Vary which side is sparse, including empty inputs
        let nq = rng.gen_range(0..40);
        let nd = rng.gen_range(0..60);
        let q_chroms = &chroms[..rng.gen_range(1..=chroms.len())];
        let d_chroms = &chroms[rng.gen_range(0..chroms.len())..];

        let query = random_sorted(&mut rng, q_chroms, nq, ChromOrder::Lexicographic);
        let database = random_sorted(&mut rng, d_chroms, nd, ChromOrder::Lexicographic);

        assert_eq!(
            sweep(ChromOrder::Lexicographic, &query, &database),
            naive(&query, &database),
            "round {round}\nquery:\n{query}\ndatabase:\n{database}"
        );
    }
}

#[test]
fn test_sweep_matches_brute_force_natural() {
    let mut rng = SmallRng::seed_from_u64(11);
    let chroms = ["chr1", "chr2", "chr9", "chr10", "chr22", "chrM", "chrX"];

    for round in 0..200 {
        let nq = rng.gen_range(0..40);
        let nd = rng.gen_range(0..60);
        let picked: Vec<&str> = chroms.iter().copied().filter(|_| rng.gen_bool(0.6)).collect();
        let d_chroms: &[&str] = if picked.is_empty() { &chroms } else { &picked };

        let query = random_sorted(&mut rng, &chroms, nq, ChromOrder::Natural);
        let database = random_sorted(&mut rng, d_chroms, nd, ChromOrder::Natural);

        assert_eq!(
            sweep(ChromOrder::Natural, &query, &database),
            naive(&query, &database),
            "round {round}\nquery:\n{query}\ndatabase:\n{database}"
        );
    }
}

#[test]
fn test_dense_overlaps_match_brute_force() {
    // Long database intervals keep many entries in the cache at once
    let mut rng = SmallRng::seed_from_u64(3);
    let mut db: Vec<(u64, u64)> = (0..300)
        .map(|_| {
            let s = rng.gen_range(0..5_000u64);
            (s, s + rng.gen_range(1..3_000u64))
        })
        .collect();
    db.sort();
    let mut q: Vec<(u64, u64)> = (0..300)
        .map(|_| {
            let s = rng.gen_range(0..8_000u64);
            (s, s + rng.gen_range(1..40u64))
        })
        .collect();
    q.sort();

    let query: String = q.iter().map(|(s, e)| format!("chr1\t{s}\t{e}\n")).collect();
    let database: String = db.iter().map(|(s, e)| format!("chr1\t{s}\t{e}\n")).collect();

    assert_eq!(
        sweep(ChromOrder::Lexicographic, &query, &database),
        naive(&query, &database)
    );
}

// =============================================================================
// Indexed sweep vs streaming sweep
// =============================================================================

#[test]
fn test_indexed_matches_streaming() {
    let mut rng = SmallRng::seed_from_u64(42);
    let chroms = ["chr1", "chr10", "chr2", "chr3", "chrX", "chrY"];

    for round in 0..50 {
        let dir = TempDir::new().unwrap();
        let q_chroms = &chroms[rng.gen_range(0..3)..];
        let d_chroms = &chroms[..rng.gen_range(1..=chroms.len())];
        let nq = rng.gen_range(1..50);
        let nd = rng.gen_range(1..80);
        let query = random_sorted(&mut rng, q_chroms, nq, ChromOrder::Lexicographic);
        let database = random_sorted(&mut rng, d_chroms, nd, ChromOrder::Lexicographic);

        let q_path = write_bed(&dir, "query.bed", &query);
        let d_path = write_bed(&dir, "database.bed", &database);

        let mut cmd = CountCommand::new();
        cmd.order = ChromOrder::Lexicographic;
        let streaming = count_file(&cmd, &q_path, &d_path);

        cmd.indexed = true;
        let indexed = count_file(&cmd, &q_path, &d_path);

        assert_eq!(streaming, indexed, "round {round}");
    }
}

#[test]
fn test_indexed_matches_streaming_per_chromosome() {
    let mut rng = SmallRng::seed_from_u64(5);
    let chroms = ["chr1", "chr2", "chr3"];
    let query = random_sorted(&mut rng, &chroms, 60, ChromOrder::Lexicographic);
    let database = random_sorted(&mut rng, &chroms[1..], 90, ChromOrder::Lexicographic);

    let dir = TempDir::new().unwrap();
    let q_path = write_bed(&dir, "q.bed", &query);
    let d_path = write_bed(&dir, "d.bed", &database);

    let mut cmd = CountCommand::new();
    cmd.indexed = true;
    let indexed = count_file(&cmd, &q_path, &d_path);
    let indexed_lines: Vec<&str> = indexed.lines().collect();

    // Restrict both inputs to one chromosome and sweep without an index
    let mut line = 0;
    for chrom in chroms {
        let keep = |content: &str| -> String {
            content
                .lines()
                .filter(|l| l.split('\t').next() == Some(chrom))
                .map(|l| format!("{l}\n"))
                .collect()
        };
        let q_chrom = keep(&query);
        let d_chrom = keep(&database);
        let counts = sweep(ChromOrder::Lexicographic, &q_chrom, &d_chrom);

        for (q_line, count) in q_chrom.lines().zip(counts) {
            assert_eq!(indexed_lines[line], format!("{q_line}\t{count}"));
            line += 1;
        }
    }
    assert_eq!(line, indexed_lines.len());
}

#[test]
fn test_indexed_is_order_agnostic() {
    // Naturally sorted files: the indexed path never compares chromosome labels
    let mut rng = SmallRng::seed_from_u64(9);
    let chroms = ["chr2", "chr9", "chr10", "chr11"];
    let query = random_sorted(&mut rng, &chroms, 40, ChromOrder::Natural);
    let database = random_sorted(&mut rng, &chroms, 40, ChromOrder::Natural);

    let dir = TempDir::new().unwrap();
    let q_path = write_bed(&dir, "q.bed", &query);
    let d_path = write_bed(&dir, "d.bed", &database);

    let mut cmd = CountCommand::new();
    cmd.indexed = true;
    cmd.order = ChromOrder::Lexicographic;
    let indexed = count_file(&cmd, &q_path, &d_path);

    let expected: String = parse_records(&query)
        .unwrap()
        .iter()
        .zip(naive(&query, &database))
        .map(|(rec, n)| format!("{rec}\t{n}\n"))
        .collect();
    assert_eq!(indexed, expected);
}

// =============================================================================
// Index file properties
// =============================================================================

#[test]
fn test_reindex_is_byte_identical() {
    let mut rng = SmallRng::seed_from_u64(1);
    let content = random_sorted(&mut rng, &["chr1", "chr2", "chrX"], 500, ChromOrder::Lexicographic);
    let dir = TempDir::new().unwrap();
    let path = write_bed(&dir, "source.bed", &content);

    ChromIndex::rebuild(&path).unwrap();
    let first = fs::read(index_path(&path)).unwrap();
    ChromIndex::rebuild(&path).unwrap();
    let second = fs::read(index_path(&path)).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_index_blocks_cover_file() {
    let mut rng = SmallRng::seed_from_u64(2);
    let content = random_sorted(&mut rng, &["chr1", "chr2", "chr3"], 300, ChromOrder::Lexicographic);
    let dir = TempDir::new().unwrap();
    let path = write_bed(&dir, "source.bed", &content);

    let index = ChromIndex::build_from_path(&path).unwrap();
    let bytes = fs::read(&path).unwrap();
    let records: Vec<BedRecord> = parse_records(&content).unwrap();

    assert_eq!(index.record_count() as usize, records.len());
    let mut expected_start = 0;
    for entry in index.entries() {
        assert_eq!(entry.start_offset, expected_start);
        let block = std::str::from_utf8(&bytes[entry.start_offset as usize..entry.end_offset as usize]).unwrap();
        let block_records = parse_records(block).unwrap();
        assert_eq!(block_records.len() as u64, entry.record_count);
        assert!(block_records.iter().all(|r| r.chrom() == entry.chrom));
        assert_eq!(
            block_records.iter().map(|r| r.len()).max().unwrap(),
            entry.max_interval_length
        );
        expected_start = entry.end_offset;
    }
    assert_eq!(expected_start, bytes.len() as u64);
}

#[test]
fn test_natural_cmp_is_consistent_with_sort() {
    let mut chroms = vec!["chr10", "chr1", "chrX", "chr2", "chr22", "chr3"];
    chroms.sort_by(|a, b| natural_cmp(a, b));
    for pair in chroms.windows(2) {
        assert_eq!(ChromOrder::Natural.compare(pair[0], pair[1]), Ordering::Less);
    }
}
