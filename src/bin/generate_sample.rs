use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::Int64Array;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Queue weights of the sample WFQ run, one per queue_id.
const WEIGHTS: [u64; 4] = [500, 1000, 1500, 2000];
const BANDWIDTH_SAMPLES: usize = 200;
const REQUESTS: usize = 400;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Bandwidth proportion per set: each set converges to its weight share.
fn write_bandwidth(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    let total: u64 = WEIGHTS.iter().sum();
    let mut writer = csv::Writer::from_path(path).context("creating bandwidth CSV")?;
    writer.write_record(["set_1", "set_2", "set_3", "set_4"])?;

    for step in 0..BANDWIDTH_SAMPLES {
        // Early samples are noisy while queues warm up.
        let noise = 0.08 / (1.0 + step as f64 / 20.0);
        let raw: Vec<f64> = WEIGHTS
            .iter()
            .map(|&w| (w as f64 / total as f64 + rng.gauss(0.0, noise)).max(0.0))
            .collect();
        let sum: f64 = raw.iter().sum::<f64>().max(f64::EPSILON);
        writer.write_record(raw.iter().map(|v| format!("{:.6}", v / sum)))?;
    }
    writer.flush()?;
    Ok(())
}

/// Per-request start and elapsed time in nanoseconds.
fn timestamps(rng: &mut SimpleRng) -> (Vec<i64>, Vec<i64>, Vec<i64>) {
    let mut queue_ids = Vec::with_capacity(REQUESTS);
    let mut starts = Vec::with_capacity(REQUESTS);
    let mut elapsed = Vec::with_capacity(REQUESTS);

    let mut clock: i64 = 1_000_000;
    for i in 0..REQUESTS {
        let queue = i % WEIGHTS.len();
        clock += (rng.next_f64() * 50_000.0) as i64 + 1_000;
        // Heavier queues are served sooner.
        let base = 4.0e10 / WEIGHTS[queue] as f64;
        let service = rng.gauss(base, base * 0.1).max(1_000.0) as i64;

        queue_ids.push(queue as i64);
        starts.push(clock);
        elapsed.push(service);
    }
    (queue_ids, starts, elapsed)
}

fn write_timestamps_csv(path: &Path, cols: &(Vec<i64>, Vec<i64>, Vec<i64>)) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating timestamp CSV")?;
    writer.write_record(["queue_id", "start_time", "elapsed"])?;
    for ((q, s), e) in cols.0.iter().zip(&cols.1).zip(&cols.2) {
        writer.write_record([q.to_string(), s.to_string(), e.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_timestamps_parquet(path: &Path, cols: &(Vec<i64>, Vec<i64>, Vec<i64>)) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("queue_id", DataType::Int64, false),
        Field::new("start_time", DataType::Int64, false),
        Field::new("elapsed", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(cols.0.clone())),
            Arc::new(Int64Array::from(cols.1.clone())),
            Arc::new(Int64Array::from(cols.2.clone())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    std::fs::create_dir_all("wfq")?;
    std::fs::create_dir_all("build")?;

    let bandwidth = Path::new("wfq/output.csv");
    write_bandwidth(bandwidth, &mut rng)?;
    println!("Wrote {BANDWIDTH_SAMPLES} bandwidth samples to {}", bandwidth.display());

    let cols = timestamps(&mut rng);
    let csv_path = Path::new("build/timestamp_output.csv");
    let parquet_path = Path::new("build/timestamp_output.parquet");
    write_timestamps_csv(csv_path, &cols)?;
    write_timestamps_parquet(parquet_path, &cols)?;
    println!(
        "Wrote {REQUESTS} request timings over {} queues to {} and {}",
        WEIGHTS.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
