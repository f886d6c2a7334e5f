//! Simulation statistics collection and reporting.
//!
//! This module tracks the protocol activity of a simulation run. It provides:
//! 1. **Cycles and throughput:** Total steps and retired offloaded instructions per cycle.
//! 2. **Issue path:** Compressed and issue offers, stalls, accepts, rejects, capacity stalls.
//! 3. **Commit:** Commits and kills.
//! 4. **Memory:** Requests, backpressure stalls, delivered and discarded results.
//! 5. **Result and core:** Result stalls, retirements, fetches, offloads, native instructions, hazard stalls.

use std::time::Instant;

use serde::Serialize;

/// Simulation statistics structure tracking all protocol metrics.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Total simulated steps.
    pub cycles: u64,

    /// Compressed handshakes completed.
    pub compressed_offered: u64,
    /// Compressed parcels expanded by the extension.
    pub compressed_accepted: u64,
    /// Compressed offers that saw `ready=false`.
    pub compressed_stalls: u64,

    /// Issue handshakes completed.
    pub issue_offered: u64,
    /// Instructions accepted at issue.
    pub issue_accepted: u64,
    /// Instructions rejected at issue.
    pub issue_rejected: u64,
    /// Issue offers that saw `ready=false`.
    pub issue_stalls: u64,
    /// Cycles a candidate waited for a free tracker slot.
    pub capacity_stalls: u64,

    /// Instructions committed.
    pub committed: u64,
    /// Instructions killed.
    pub killed: u64,

    /// Memory requests accepted.
    pub mem_requests: u64,
    /// Memory requests that saw `ready=false`.
    pub mem_stalls: u64,
    /// Memory results delivered to the extension.
    pub mem_results: u64,
    /// Memory results discarded because their instruction was killed.
    pub mem_discarded: u64,

    /// Results that saw `ready=false`.
    pub result_stalls: u64,
    /// Instructions retired through the result channel.
    pub retired: u64,
    /// Largest number of simultaneously tracked instructions.
    pub peak_in_flight: usize,

    /// Words read over the instruction port.
    pub fetches: u64,
    /// Instructions the core handed to the extension.
    pub offloaded: u64,
    /// Instructions the core handled itself (standard opcodes, refused or rejected offers).
    pub native_instructions: u64,
    /// Cycles issue waited on a source register written by an in-flight instruction.
    pub hazard_stalls: u64,
    /// Register writebacks performed.
    pub writebacks: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            compressed_offered: 0,
            compressed_accepted: 0,
            compressed_stalls: 0,
            issue_offered: 0,
            issue_accepted: 0,
            issue_rejected: 0,
            issue_stalls: 0,
            capacity_stalls: 0,
            committed: 0,
            killed: 0,
            mem_requests: 0,
            mem_stalls: 0,
            mem_results: 0,
            mem_discarded: 0,
            result_stalls: 0,
            retired: 0,
            peak_in_flight: 0,
            fetches: 0,
            offloaded: 0,
            native_instructions: 0,
            hazard_stalls: 0,
            writebacks: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"issue"`, `"memory"`, `"result"`, `"core"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "issue", "memory", "result", "core"];

impl SimStats {
    /// Retired offloaded instructions per cycle.
    pub fn offload_ipc(&self) -> f64 {
        self.retired as f64 / self.cycles.max(1) as f64
    }

    /// Every accepted instruction either retired or was killed.
    pub const fn balanced(&self) -> bool {
        self.issue_accepted == self.retired + self.killed
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let pct = |n: u64, total: u64| {
            if total == 0 {
                0.0
            } else {
                100.0 * n as f64 / total as f64
            }
        };

        if want("summary") {
            let seconds = self.start_time.elapsed().as_secs_f64();
            println!("\n==========================================================");
            println!("XIF SUBSYSTEM SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("xif_retired              {}", self.retired);
            println!("xif_killed               {}", self.killed);
            println!("xif_ipc                  {:.4}", self.offload_ipc());
            println!("xif_peak_in_flight       {}", self.peak_in_flight);
            println!("----------------------------------------------------------");
        }
        if want("issue") {
            println!("ISSUE");
            println!(
                "  compressed.offered     {} (expanded {:.2}%)",
                self.compressed_offered,
                pct(self.compressed_accepted, self.compressed_offered)
            );
            println!("  compressed.stalls      {}", self.compressed_stalls);
            println!(
                "  issue.offered          {} (accepted {:.2}%)",
                self.issue_offered,
                pct(self.issue_accepted, self.issue_offered)
            );
            println!("  issue.rejected         {}", self.issue_rejected);
            println!(
                "  issue.stalls           {} ({:.2}% of cycles)",
                self.issue_stalls,
                self.issue_stalls as f64 / cyc * 100.0
            );
            println!("  issue.capacity_stalls  {}", self.capacity_stalls);
            println!("  commit.committed       {}", self.committed);
            println!("  commit.killed          {}", self.killed);
            println!("----------------------------------------------------------");
        }
        if want("memory") {
            println!("MEMORY");
            println!("  mem.requests           {}", self.mem_requests);
            println!("  mem.stalls             {}", self.mem_stalls);
            println!("  mem.results            {}", self.mem_results);
            println!("  mem.discarded          {}", self.mem_discarded);
            println!("----------------------------------------------------------");
        }
        if want("result") {
            println!("RESULT");
            println!("  result.retired         {}", self.retired);
            println!("  result.stalls          {}", self.result_stalls);
            println!("----------------------------------------------------------");
        }
        if want("core") {
            println!("CORE");
            println!("  core.fetches           {}", self.fetches);
            println!("  core.offloaded         {}", self.offloaded);
            println!("  core.native            {}", self.native_instructions);
            println!("  core.hazard_stalls     {}", self.hazard_stalls);
            println!("  core.writebacks        {}", self.writebacks);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
