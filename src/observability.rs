use clap::ValueEnum;
use cpu_time::ProcessTime;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::time::{Duration, Instant};

const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

/// Run `f` and report how long it took on the wall clock.
pub fn timed<T, E, F>(f: F) -> Result<(T, Duration), E>
where
    F: FnOnce() -> Result<T, E>,
{
    let start = Instant::now();
    let value = f()?;
    Ok((value, start.elapsed()))
}

/// Clock used for the write/read measurements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Timer {
    /// Elapsed real time
    #[default]
    Wall,
    /// CPU time of the whole process, summed over all threads
    Cpu,
}

/// Like [`timed`], but measured on the chosen clock.
pub fn timed_with<T, E, F>(timer: Timer, f: F) -> Result<(T, Duration), E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<io::Error>,
{
    match timer {
        Timer::Wall => timed(f),
        Timer::Cpu => {
            let start = ProcessTime::try_now()?;
            let value = f()?;
            Ok((value, start.try_elapsed()?))
        }
    }
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

pub fn get_file_size_in_megabytes<P: AsRef<Path>>(path: P, decimals: u32) -> io::Result<f64> {
    let size = std::fs::metadata(path)?.len();
    Ok(round_to(size as f64 / BYTES_PER_MEGABYTE, decimals))
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FileStats {
    pub path: String,
    pub size_bytes: u64,
    pub size_mb: f64,
    pub sha256: Option<String>, // hex
}

impl FileStats {
    pub fn collect<P: AsRef<Path>>(path: P, decimals: u32, with_hash: bool) -> io::Result<Self> {
        let path = path.as_ref();
        let size_bytes = std::fs::metadata(path)?.len();
        let size_mb = get_file_size_in_megabytes(path, decimals)?;
        let sha256 = if with_hash {
            Some(compute_file_hash(path)?)
        } else {
            None
        };
        Ok(Self {
            path: path.display().to_string(),
            size_bytes,
            size_mb,
            sha256,
        })
    }
}

pub fn compute_file_hash<P: AsRef<Path>>(path: P) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0; 64 * 1024];

    loop {
        let count = file.read(&mut buffer)?;
        if count == 0 {
            break;
        }
        hasher.update(&buffer[..count]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_file_size_in_megabytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("one_and_half.bin");
        fs::write(&path, vec![0u8; 1_572_864]).unwrap();
        assert_eq!(get_file_size_in_megabytes(&path, 2).unwrap(), 1.5);

        let small = dir.path().join("small.bin");
        fs::write(&small, vec![0u8; 1000]).unwrap();
        assert_eq!(get_file_size_in_megabytes(&small, 2).unwrap(), 0.0);
        assert_eq!(get_file_size_in_megabytes(&small, 4).unwrap(), 0.001);

        let odd = dir.path().join("odd.bin");
        fs::write(&odd, vec![1u8; 3_000_000]).unwrap();
        // 3_000_000 / 1_048_576 = 2.861022...
        assert_eq!(get_file_size_in_megabytes(&odd, 2).unwrap(), 2.86);
        assert_eq!(get_file_size_in_megabytes(&odd, 0).unwrap(), 3.0);
    }

    #[test]
    fn test_file_size_missing_file() {
        let dir = tempdir().unwrap();
        assert!(get_file_size_in_megabytes(dir.path().join("nope"), 2).is_err());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(1.235_000_1, 2), 1.24);
        assert_eq!(round_to(7.0, 0), 7.0);
    }

    #[test]
    fn test_timed_propagates() {
        let (value, elapsed) = timed(|| Ok::<_, io::Error>(21 * 2)).unwrap();
        assert_eq!(value, 42);
        assert!(elapsed.as_secs_f64().is_finite());

        let err = timed(|| Err::<(), _>(io::Error::other("boom")));
        assert!(err.is_err());
    }

    #[test]
    fn test_timed_on_cpu_clock() {
        let (sum, elapsed) = timed_with(Timer::Cpu, || {
            Ok::<_, io::Error>((0..2_000_000u64).fold(0u64, |acc, x| acc.wrapping_add(x * x)))
        })
        .unwrap();
        assert!(sum > 0);
        assert!(elapsed.as_secs_f64().is_finite());

        let (_, wall) = timed_with(Timer::Wall, || Ok::<_, io::Error>(())).unwrap();
        assert!(wall.as_secs_f64() >= 0.0);

        let err = timed_with(Timer::Cpu, || Err::<(), _>(io::Error::other("boom")));
        assert!(err.is_err());
    }

    #[test]
    fn test_file_stats_size_matches_megabytes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.bin");
        fs::write(&path, vec![7u8; 3_000_000]).unwrap();

        let stats = FileStats::collect(&path, 2, false).unwrap();
        assert_eq!(stats.size_bytes, 3_000_000);
        assert_eq!(stats.size_mb, get_file_size_in_megabytes(&path, 2).unwrap());
        assert_eq!(stats.size_mb, 2.86);
    }

    #[test]
    fn test_file_stats_with_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();

        let stats = FileStats::collect(&path, 2, true).unwrap();
        assert_eq!(stats.size_bytes, 3);
        assert_eq!(stats.size_mb, 0.0);
        assert_eq!(
            stats.sha256.as_deref(),
            Some("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad")
        );

        let unhashed = FileStats::collect(&path, 2, false).unwrap();
        assert_eq!(unhashed.sha256, None);
    }
}
