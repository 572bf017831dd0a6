//! Centralized argument handling
//!
//! Features:
//! - Process-wide CMD_ARGS storage with thread-safe access
//! - Debug flag checking functions per module
//! - Unified argument lookup utilities shared by the tool binaries
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::env;

/// Global command-line arguments storage
/// Defaults to `env::args()`; binaries and tests may override it
pub static CMD_ARGS: Lazy<Mutex<Vec<String>>> = Lazy::new(|| Mutex::new(env::args().collect()));

/// Sets the global command-line arguments
pub fn set_cmd_args(args: Vec<String>) {
    *CMD_ARGS.lock() = args;
}

/// Gets a copy of the current command-line arguments
pub fn get_cmd_args() -> Vec<String> {
    CMD_ARGS.lock().clone()
}

/// Checks if a specific argument is present in the command line
pub fn has_arg(arg: &str) -> bool {
    CMD_ARGS.lock().iter().any(|a| a == arg)
}

/// Gets the value of a command-line argument that follows a flag
/// Returns None if the flag is not found or has no value
pub fn get_arg_value(flag: &str) -> Option<String> {
    let args = CMD_ARGS.lock();
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

// =============================================================================
// DEBUG FLAG CHECKING FUNCTIONS
// =============================================================================

/// Cache module debug mode
pub fn is_debug_cache_enabled() -> bool {
    has_arg("--debug-cache")
}

/// Config loading debug mode
pub fn is_debug_config_enabled() -> bool {
    has_arg("--debug-config")
}

/// Stress tool debug mode
pub fn is_debug_stress_enabled() -> bool {
    has_arg("--debug-stress")
}

/// Checks if any debug mode is enabled
pub fn is_any_debug_enabled() -> bool {
    is_debug_cache_enabled() || is_debug_config_enabled() || is_debug_stress_enabled()
}

pub fn print_help() {
    println!("tool_cache_stress - concurrent stress run for the recency cache");
    println!();
    println!("USAGE:");
    println!("    tool_cache_stress [FLAGS]");
    println!();
    println!("OPTIONS:");
    println!("    --config <path>           TOML config file (default: data/config.toml)");
    println!("    --capacity <n>            Cache capacity (overrides config)");
    println!("    --shards <n>              Shard count; > 1 selects the sharded cache");
    println!("    --threads <n>             Worker threads");
    println!("    --ops <n>                 Operations per thread");
    println!("    --keys <n>                Size of the key space");
    println!("    --json                    Print the report as JSON");
    println!();
    println!("LOGGING FLAGS:");
    println!("    --quiet                   Warnings and errors only");
    println!("    --verbose                 Everything, for all modules");
    println!("    --log-level <level>       error | warning | info | debug | verbose");
    println!("    --no-color                Plain console output");
    println!("    --debug-cache             Cache module debug mode");
    println!("    --debug-config            Config loading debug mode");
    println!("    --debug-stress            Stress tool debug mode");
    println!("    --debug-system            System debug mode");
    println!("    --verbose-<module>        Verbose output for one module");
    println!("                              (cache, config, stress, system)");
    println!();
    println!("EXAMPLES:");
    println!("    tool_cache_stress --capacity 1024 --threads 8");
    println!("    tool_cache_stress --shards 16 --json");
    println!("    tool_cache_stress --config data/config.toml --debug-cache");
}
