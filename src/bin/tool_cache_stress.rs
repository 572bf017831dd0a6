//! Cache Stress Tool
//!
//! Hammers a recency cache from many threads with a random get/put mix,
//! audits the structural invariants under the lock, and reports metrics.
//!
//! Usage: cargo run --bin tool_cache_stress -- --capacity 1024 --threads 8 [--shards 16] [--json]
use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, Command};
use comfy_table::{presets::UTF8_FULL, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use recency_cache::arguments;
use recency_cache::config::{self, StressSection};
use recency_cache::logger::{self, LogTag};
use recency_cache::{
    BoundedRecencyCache, CacheConfig, CacheMetrics, CacheResult, ShardedRecencyCache,
};
use serde::Serialize;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Common surface of the two cache flavours under test
trait StressTarget: Send + Sync {
    fn get(&self, key: &u64) -> Option<u64>;
    fn put(&self, key: u64, value: u64);
    fn len(&self) -> usize;
    fn capacity(&self) -> usize;
    fn metrics(&self) -> CacheMetrics;
    fn reset_metrics(&self);
    fn check_invariants(&self) -> CacheResult<()>;
}

impl StressTarget for BoundedRecencyCache<u64, u64> {
    fn get(&self, key: &u64) -> Option<u64> {
        BoundedRecencyCache::get(self, key)
    }
    fn put(&self, key: u64, value: u64) {
        BoundedRecencyCache::put(self, key, value)
    }
    fn len(&self) -> usize {
        BoundedRecencyCache::len(self)
    }
    fn capacity(&self) -> usize {
        BoundedRecencyCache::capacity(self)
    }
    fn metrics(&self) -> CacheMetrics {
        BoundedRecencyCache::metrics(self)
    }
    fn reset_metrics(&self) {
        BoundedRecencyCache::reset_metrics(self)
    }
    fn check_invariants(&self) -> CacheResult<()> {
        BoundedRecencyCache::check_invariants(self)
    }
}

impl StressTarget for ShardedRecencyCache<u64, u64> {
    fn get(&self, key: &u64) -> Option<u64> {
        ShardedRecencyCache::get(self, key)
    }
    fn put(&self, key: u64, value: u64) {
        ShardedRecencyCache::put(self, key, value)
    }
    fn len(&self) -> usize {
        ShardedRecencyCache::len(self)
    }
    fn capacity(&self) -> usize {
        ShardedRecencyCache::capacity(self)
    }
    fn metrics(&self) -> CacheMetrics {
        ShardedRecencyCache::metrics(self)
    }
    fn reset_metrics(&self) {
        ShardedRecencyCache::reset_metrics(self)
    }
    fn check_invariants(&self) -> CacheResult<()> {
        ShardedRecencyCache::check_invariants(self)
    }
}

#[derive(Debug, Serialize)]
struct StressReport {
    capacity: usize,
    shards: usize,
    threads: usize,
    operations: u64,
    elapsed_ms: u128,
    ops_per_sec: f64,
    final_len: usize,
    hit_rate: f64,
    metrics: CacheMetrics,
}

fn build_command() -> Command {
    Command::new("Cache Stress Tool")
        .version("1.0")
        .about("Concurrent get/put stress run with invariant audits")
        .disable_help_flag(true)
        .arg(flag("help").short('h'))
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .default_value(config::CONFIG_FILE_PATH),
        )
        .arg(Arg::new("capacity").long("capacity").value_parser(value_parser!(usize)))
        .arg(Arg::new("shards").long("shards").value_parser(value_parser!(usize)))
        .arg(Arg::new("threads").long("threads").value_parser(value_parser!(usize)))
        .arg(Arg::new("ops").long("ops").value_parser(value_parser!(usize)))
        .arg(Arg::new("keys").long("keys").value_parser(value_parser!(usize)))
        .arg(Arg::new("json").long("json").action(ArgAction::SetTrue))
        // Consumed by the logger through the argument store
        .arg(flag("quiet"))
        .arg(flag("verbose"))
        .arg(flag("no-color"))
        .arg(Arg::new("log-level").long("log-level").value_name("LEVEL"))
        .arg(flag("debug-cache"))
        .arg(flag("debug-config"))
        .arg(flag("debug-stress"))
        .arg(flag("debug-system"))
        .arg(flag("verbose-cache"))
        .arg(flag("verbose-config"))
        .arg(flag("verbose-stress"))
        .arg(flag("verbose-system"))
}

fn flag(name: &'static str) -> Arg {
    Arg::new(name).long(name).action(ArgAction::SetTrue)
}

/// Insert `capacity` keys above every worker range, then zero the counters so
/// the report covers only the measured run.
fn prefill(target: &dyn StressTarget, stress: &StressSection) {
    let first = (stress.threads * stress.key_space) as u64;
    for key in first..first + target.capacity() as u64 {
        target.put(key, 0);
    }
    target.reset_metrics();

    if logger::is_verbose_enabled_for_tag(&LogTag::Stress) {
        logger::verbose(
            LogTag::Stress,
            &format!("Prefilled {} entries from key {}", target.len(), first),
        );
    }
}

fn run_workload(target: Arc<dyn StressTarget>, stress: &StressSection) -> Result<u64> {
    let handles: Vec<_> = (0..stress.threads)
        .map(|t| {
            let target = Arc::clone(&target);
            let stress = stress.clone();
            thread::spawn(move || -> CacheResult<u64> {
                let mut rng = StdRng::seed_from_u64(0x5eed ^ t as u64);
                // Each thread owns a disjoint key range.
                let base = (t * stress.key_space) as u64;
                let mut hits = 0u64;

                for op in 0..stress.operations_per_thread {
                    let key = base + rng.gen_range(0..stress.key_space as u64);
                    if rng.gen_bool(stress.read_ratio) {
                        if target.get(&key).is_some() {
                            hits += 1;
                        }
                    } else {
                        target.put(key, op as u64);
                    }

                    if stress.check_every > 0 && (op + 1) % stress.check_every == 0 {
                        target.check_invariants()?;
                    }
                }
                Ok(hits)
            })
        })
        .collect();

    let mut hits = 0;
    for (t, handle) in handles.into_iter().enumerate() {
        let thread_hits = handle
            .join()
            .map_err(|_| anyhow::anyhow!("worker thread {} panicked", t))?
            .with_context(|| format!("worker thread {} found a broken cache", t))?;
        if arguments::is_debug_stress_enabled() {
            logger::debug(
                LogTag::Stress,
                &format!("Thread {} finished with {} hits", t, thread_hits),
            );
        }
        hits += thread_hits;
    }
    Ok(hits)
}

fn print_table(report: &StressReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(["Metric", "Value"]);

    let rows: Vec<(&str, String)> = vec![
        ("Capacity", report.capacity.to_string()),
        ("Shards", report.shards.to_string()),
        ("Threads", report.threads.to_string()),
        ("Operations", report.operations.to_string()),
        ("Elapsed", format!("{} ms", report.elapsed_ms)),
        ("Throughput", format!("{:.0} ops/s", report.ops_per_sec)),
        ("Final size", report.final_len.to_string()),
        ("Hits", report.metrics.hits.to_string()),
        ("Misses", report.metrics.misses.to_string()),
        ("Hit rate", format!("{:.2}%", report.hit_rate * 100.0)),
        ("Inserts", report.metrics.inserts.to_string()),
        ("Updates", report.metrics.updates.to_string()),
        ("Evictions", report.metrics.evictions.to_string()),
    ];
    for (name, value) in rows {
        table.add_row([name.to_string(), value]);
    }

    println!("{}", table);
}

fn main() -> Result<()> {
    arguments::set_cmd_args(std::env::args().collect());
    logger::init();

    let matches = build_command().get_matches();
    if matches.get_flag("help") {
        arguments::print_help();
        return Ok(());
    }

    let config_path = matches
        .get_one::<String>("config")
        .cloned()
        .unwrap_or_else(|| config::CONFIG_FILE_PATH.to_string());
    config::load_config_from_path(&config_path)
        .with_context(|| format!("loading configuration from '{}'", config_path))?;

    let mut loaded = config::get_config_clone();
    if let Some(&capacity) = matches.get_one::<usize>("capacity") {
        loaded.cache.capacity = capacity;
    }
    if let Some(&shards) = matches.get_one::<usize>("shards") {
        loaded.cache.shards = shards;
    }
    if let Some(&threads) = matches.get_one::<usize>("threads") {
        loaded.stress.threads = threads;
    }
    if let Some(&ops) = matches.get_one::<usize>("ops") {
        loaded.stress.operations_per_thread = ops;
    }
    if let Some(&keys) = matches.get_one::<usize>("keys") {
        loaded.stress.key_space = keys;
    }
    loaded.validate().context("invalid stress configuration")?;

    let cache_config: CacheConfig = loaded.cache.to_cache_config();
    let target: Arc<dyn StressTarget> = if cache_config.is_sharded() {
        Arc::new(ShardedRecencyCache::<u64, u64>::with_config(&cache_config)?)
    } else {
        Arc::new(BoundedRecencyCache::<u64, u64>::with_config(&cache_config)?)
    };

    logger::info(
        LogTag::Stress,
        &format!(
            "Starting: capacity={} shards={} threads={} ops/thread={} keys/thread={}",
            target.capacity(),
            cache_config.shards,
            loaded.stress.threads,
            loaded.stress.operations_per_thread,
            loaded.stress.key_space
        ),
    );

    prefill(target.as_ref(), &loaded.stress);

    let started = Instant::now();
    let worker_hits = run_workload(Arc::clone(&target), &loaded.stress)?;
    let elapsed = started.elapsed();
    logger::debug(
        LogTag::Stress,
        &format!("Workers observed {} hits in {:?}", worker_hits, elapsed),
    );

    if let Err(e) = target.check_invariants() {
        logger::error(LogTag::Stress, &format!("Final audit failed: {}", e));
        bail!(e);
    }
    if target.len() > target.capacity() {
        bail!("cache holds {} entries over capacity {}", target.len(), target.capacity());
    }

    let operations = (loaded.stress.threads * loaded.stress.operations_per_thread) as u64;
    let metrics = target.metrics();
    let report = StressReport {
        capacity: target.capacity(),
        shards: cache_config.shards,
        threads: loaded.stress.threads,
        operations,
        elapsed_ms: elapsed.as_millis(),
        ops_per_sec: operations as f64 / elapsed.as_secs_f64().max(f64::EPSILON),
        final_len: target.len(),
        hit_rate: metrics.hit_rate(),
        metrics,
    };

    if matches.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }

    logger::info(LogTag::Stress, "Invariants held for the whole run");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_every_logger_flag() {
        let matches = build_command()
            .try_get_matches_from([
                "tool_cache_stress",
                "--verbose-cache",
                "--verbose-config",
                "--verbose-stress",
                "--verbose-system",
                "--debug-system",
                "--log-level",
                "debug",
                "--no-color",
                "--ops",
                "10",
            ])
            .unwrap();
        assert_eq!(matches.get_one::<usize>("ops"), Some(&10));

        let config = logger::config_from_args(&[
            "tool_cache_stress".to_string(),
            "--verbose-cache".to_string(),
        ]);
        assert!(config.verbose_tags.contains("cache"));
    }

    #[test]
    fn test_unknown_flag_still_rejected() {
        assert!(build_command()
            .try_get_matches_from(["tool_cache_stress", "--bogus"])
            .is_err());
    }

    #[test]
    fn test_prefill_fills_outside_worker_ranges() {
        let mut stress = StressSection::default();
        stress.threads = 2;
        stress.key_space = 10;
        let cache = BoundedRecencyCache::<u64, u64>::new(5).unwrap();

        prefill(&cache, &stress);

        assert_eq!(StressTarget::len(&cache), 5);
        assert_eq!(cache.keys().into_iter().min(), Some(20));
        assert_eq!(StressTarget::metrics(&cache), CacheMetrics::default());
    }
}
