//! Simulator: builds the subsystem for a scenario and runs it.
//!
//! The simulator owns one `CpuSubsystem` wired to the reference
//! accelerator. `run` ticks until the subsystem sleeps (program fetched,
//! everything retired or killed, no memory traffic left) or the cycle
//! budget runs out.

use serde::Serialize;
use tracing::{info, warn};

use crate::common::RegisterFile;
use crate::common::error::SimError;
use crate::config::Config;
use crate::core::accel::Accelerator;
use crate::core::cpu::Core;
use crate::core::xif::arbiter::XifArbiter;
use crate::sim::loader::Scenario;
use crate::soc::memory::Memory;
use crate::soc::subsystem::CpuSubsystem;
use crate::stats::SimStats;

/// Outcome of a drained run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    /// Scenario name.
    pub name: String,
    /// Cycles until the subsystem went to sleep.
    pub cycles: u64,
    /// Registers holding a non-zero value at the end, by index.
    pub regs: Vec<(usize, u32)>,
    /// Architectural state exposed by the extension (e.g. its accumulator).
    pub extension: Vec<(&'static str, u32)>,
    /// Collected statistics.
    pub stats: SimStats,
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The simulated subsystem.
    pub subsystem: CpuSubsystem,
    name: String,
    max_cycles: u64,
}

impl Simulator {
    /// Builds the subsystem for `scenario` under `config`.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration is invalid, `Scenario` or `BusFault` if
    /// the scenario does not fit the memory map.
    pub fn new(config: &Config, scenario: &Scenario) -> Result<Self, SimError> {
        config.validate()?;
        let boot = config.core.boot_addr;
        let loaded = scenario.assemble(boot)?;

        let mut memory = Memory::new(config.memory.base, config.memory.size);
        for &(addr, value) in &loaded.memory {
            memory.load(addr, &value.to_le_bytes())?;
        }
        memory.load(boot, &loaded.image)?;

        let mut core = Core::new(config, memory);
        let end = u32::try_from(loaded.image.len())
            .ok()
            .and_then(|len| boot.checked_add(len))
            .ok_or_else(|| SimError::Scenario("program runs past the address space".into()))?;
        core.set_program_end(end);
        for &(reg, value) in &loaded.regs {
            core.regs.write(reg, value);
        }
        for &pc in &loaded.kill {
            core.kill_at(pc);
        }

        let accelerator = Accelerator::new(&config.accelerator);
        let arbiter = XifArbiter::new(&config.xif, Box::new(accelerator));
        info!(
            scenario = %scenario.name,
            instructions = loaded.addresses.len(),
            boot = format_args!("{boot:#010x}"),
            "scenario loaded"
        );
        Ok(Self {
            subsystem: CpuSubsystem::new(core, arbiter),
            name: scenario.name.clone(),
            max_cycles: config.general.max_cycles,
        })
    }

    /// Advances the simulator by one clock cycle.
    ///
    /// # Errors
    ///
    /// Port faults and protocol faults.
    pub fn tick(&mut self) -> Result<(), SimError> {
        self.subsystem.tick()
    }

    /// Runs until the subsystem sleeps, for at most `max_cycles` (or the
    /// configured budget when `None`).
    ///
    /// # Errors
    ///
    /// `Timeout` if the subsystem is still busy after the budget; any fault
    /// raised while ticking.
    pub fn run(&mut self, max_cycles: Option<u64>) -> Result<RunSummary, SimError> {
        let budget = max_cycles.unwrap_or(self.max_cycles);
        while !self.subsystem.sleep() {
            if self.cycle() >= budget {
                warn!(
                    budget,
                    in_flight = self.subsystem.arbiter.tracker().len(),
                    mem_outstanding = self.subsystem.core.data_port.outstanding(),
                    "cycle budget exhausted"
                );
                return Err(SimError::Timeout(budget));
            }
            self.tick()?;
        }
        let summary = self.summary();
        info!(cycles = summary.cycles, retired = summary.stats.retired, "run drained");
        Ok(summary)
    }

    /// Cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.subsystem.arbiter.cycle()
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> SimStats {
        self.subsystem.stats()
    }

    /// Register file of the core.
    pub const fn regs(&self) -> &RegisterFile {
        &self.subsystem.core.regs
    }

    /// Snapshot of the current state.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            name: self.name.clone(),
            cycles: self.cycle(),
            regs: self.regs().non_zero().collect(),
            extension: self.subsystem.arbiter.coprocessor().registers(),
            stats: self.stats(),
        }
    }
}
