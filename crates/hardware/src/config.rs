//! Configuration system for the subsystem simulator.
//!
//! This module defines all configuration structures used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline constants (tracker capacity, boot address, memory map, latencies).
//! 2. **Structures:** Hierarchical config for general, xif, core, memory, and accelerator settings.
//! 3. **Backpressure:** `ReadyPolicy`, the core-side readiness of the memory and result channels.
//! 4. **Validation:** `Config::validate` rejects parameter combinations the model cannot run.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or use `Config::default()`.
//! Every field is optional; missing fields take the values in `defaults`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::MAX_IN_FLIGHT;
use crate::common::error::SimError;

/// Default configuration constants for the simulator.
mod defaults {
    /// In-flight instruction slots of the extension interface.
    pub const XIF_CAPACITY: usize = 16;

    /// Reset vector of the core: first instruction of the program image.
    pub const BOOT_ADDR: u32 = 0x0000_0180;

    /// Cycles between an accepted issue and the core's commit decision.
    pub const COMMIT_LATENCY: u64 = 1;

    /// Base address of the memory behind both OBI ports.
    pub const MEMORY_BASE: u32 = 0x0000_0000;

    /// Size of the memory behind both OBI ports (64 KiB).
    pub const MEMORY_SIZE: usize = 64 * 1024;

    /// Cycles from a granted data request to its response.
    pub const MEMORY_LATENCY: u64 = 1;

    /// Compute cycles of the reference accelerator once operands are complete.
    pub const ACCEL_LATENCY: u64 = 2;

    /// Instructions the reference accelerator holds before deasserting issue ready.
    pub const ACCEL_QUEUE_DEPTH: usize = 4;

    /// Safety budget for a run that never drains.
    pub const MAX_CYCLES: u64 = 1_000_000;
}

/// Core-side readiness of an extension → core channel.
///
/// Models the backpressure the core applies on the memory request channel
/// (data port grant) and on the result channel (writeback port).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "PascalCase")]
pub enum ReadyPolicy {
    /// Ready on every cycle.
    #[default]
    Always,
    /// Not ready for the first `stall` cycles of every `period` cycles.
    Periodic {
        /// Length of the repeating window in cycles.
        period: u64,
        /// Not-ready cycles at the start of each window.
        stall: u64,
    },
}

impl ReadyPolicy {
    /// Returns whether the channel is ready on `cycle`.
    #[inline]
    pub const fn is_ready(&self, cycle: u64) -> bool {
        match *self {
            Self::Always => true,
            Self::Periodic { period, stall } => period == 0 || cycle % period >= stall,
        }
    }

    fn validate(&self, name: &str) -> Result<(), SimError> {
        match *self {
            Self::Always => Ok(()),
            Self::Periodic { period: 0, .. } => Err(SimError::Config(format!(
                "{name}: period must be non-zero"
            ))),
            Self::Periodic { period, stall } if stall >= period => Err(SimError::Config(
                format!("{name}: stall ({stall}) must be smaller than period ({period})"),
            )),
            Self::Periodic { .. } => Ok(()),
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use xifsim_core::config::{Config, ReadyPolicy};
///
/// let json = r#"{
///     "xif": {
///         "capacity": 4,
///         "result_ready": { "kind": "Periodic", "period": 3, "stall": 1 }
///     },
///     "accelerator": { "latency": 5 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert_eq!(config.xif.capacity, 4);
/// assert_eq!(config.xif.mem_ready, ReadyPolicy::Always);
/// assert_eq!(config.accelerator.latency, 5);
/// assert_eq!(config.accelerator.queue_depth, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Extension interface parameters
    #[serde(default)]
    pub xif: XifConfig,
    /// Core host model parameters
    #[serde(default)]
    pub core: CoreConfig,
    /// Memory behind the instruction and data ports
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Reference accelerator parameters
    #[serde(default)]
    pub accelerator: AcceleratorConfig,
}

impl Config {
    /// Reads and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Parse` if it is not a valid
    /// configuration, `Config` if validation fails.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the parameters describe a runnable subsystem.
    ///
    /// # Errors
    ///
    /// `SimError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.xif.capacity == 0 || self.xif.capacity > MAX_IN_FLIGHT {
            return Err(SimError::Config(format!(
                "xif.capacity must be in 1..={MAX_IN_FLIGHT}, got {}",
                self.xif.capacity
            )));
        }
        self.xif.mem_ready.validate("xif.mem_ready")?;
        self.xif.result_ready.validate("xif.result_ready")?;
        if self.core.boot_addr % 4 != 0 {
            return Err(SimError::Config(format!(
                "core.boot_addr {:#010x} is not word aligned",
                self.core.boot_addr
            )));
        }
        if self.memory.size == 0 || self.memory.size % 4 != 0 {
            return Err(SimError::Config(format!(
                "memory.size must be a non-zero multiple of 4, got {}",
                self.memory.size
            )));
        }
        if self.memory.base % 4 != 0 {
            return Err(SimError::Config(format!(
                "memory.base {:#010x} is not word aligned",
                self.memory.base
            )));
        }
        if u64::from(self.memory.base) + self.memory.size as u64 > 1 << 32 {
            return Err(SimError::Config(
                "memory region extends past the 32-bit address space".to_string(),
            ));
        }
        if self.accelerator.queue_depth == 0 {
            return Err(SimError::Config(
                "accelerator.queue_depth must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// General simulation settings and options.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Log each native, offloaded and written-back instruction (disassembled) at `info` level.
    ///
    /// Handshake (`debug`) and step (`trace`) logs are always emitted and filtered by the subscriber.
    #[serde(default)]
    pub trace_instructions: bool,

    /// Cycle budget for `Simulator::run` when the caller does not give one.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_instructions: false,
            max_cycles: defaults::MAX_CYCLES,
        }
    }
}

/// Extension interface parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct XifConfig {
    /// In-flight instruction slots (hardware id space).
    #[serde(default = "XifConfig::default_capacity")]
    pub capacity: usize,

    /// Data port grant on the memory request channel.
    #[serde(default)]
    pub mem_ready: ReadyPolicy,

    /// Writeback port readiness on the result channel.
    #[serde(default)]
    pub result_ready: ReadyPolicy,
}

impl XifConfig {
    fn default_capacity() -> usize {
        defaults::XIF_CAPACITY
    }
}

impl Default for XifConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::XIF_CAPACITY,
            mem_ready: ReadyPolicy::Always,
            result_ready: ReadyPolicy::Always,
        }
    }
}

/// Core host model parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Address of the first instruction.
    #[serde(default = "CoreConfig::default_boot_addr")]
    pub boot_addr: u32,

    /// Cycles between an accepted issue and its commit/kill.
    #[serde(default = "CoreConfig::default_commit_latency")]
    pub commit_latency: u64,
}

impl CoreConfig {
    fn default_boot_addr() -> u32 {
        defaults::BOOT_ADDR
    }

    fn default_commit_latency() -> u64 {
        defaults::COMMIT_LATENCY
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            boot_addr: defaults::BOOT_ADDR,
            commit_latency: defaults::COMMIT_LATENCY,
        }
    }
}

/// Memory behind the instruction and data ports.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Base address.
    #[serde(default = "MemoryConfig::default_base")]
    pub base: u32,

    /// Size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size: usize,

    /// Cycles from grant to response on the data port.
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u64,
}

impl MemoryConfig {
    fn default_base() -> u32 {
        defaults::MEMORY_BASE
    }

    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }

    fn default_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            base: defaults::MEMORY_BASE,
            size: defaults::MEMORY_SIZE,
            latency: defaults::MEMORY_LATENCY,
        }
    }
}

/// Reference accelerator parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AcceleratorConfig {
    /// Compute cycles once the instruction is committed and its memory data is in.
    #[serde(default = "AcceleratorConfig::default_latency")]
    pub latency: u64,

    /// Accepted instructions held at once; issue is not ready beyond this.
    #[serde(default = "AcceleratorConfig::default_queue_depth")]
    pub queue_depth: usize,

    /// Issue loads before commit.
    #[serde(default = "AcceleratorConfig::default_true")]
    pub speculative_loads: bool,

    /// Expand `c.xadd` on the compressed channel.
    #[serde(default = "AcceleratorConfig::default_true")]
    pub compressed: bool,
}

impl AcceleratorConfig {
    fn default_latency() -> u64 {
        defaults::ACCEL_LATENCY
    }

    fn default_queue_depth() -> usize {
        defaults::ACCEL_QUEUE_DEPTH
    }

    const fn default_true() -> bool {
        true
    }
}

impl Default for AcceleratorConfig {
    fn default() -> Self {
        Self {
            latency: defaults::ACCEL_LATENCY,
            queue_depth: defaults::ACCEL_QUEUE_DEPTH,
            speculative_loads: true,
            compressed: true,
        }
    }
}
