//! Scenario loading.
//!
//! This module reads the JSON scenarios the simulator runs. It performs:
//! 1. **Parsing:** Words given as JSON numbers or `"0x..."` strings.
//! 2. **Assembly:** Packs the instruction list into a little-endian byte image,
//!    16-bit parcels and 32-bit words back to back.
//! 3. **Initialization:** Initial register values, memory words and the kill list.
//!
//! ```json
//! {
//!   "name": "load",
//!   "program": ["0x0005a50b", 19],
//!   "regs": { "11": "0x1000" },
//!   "memory": { "0x1000": "0xdeadbeef" },
//!   "kill": []
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::constants::{INSTRUCTION_SIZE_16, NUM_REGS, is_compressed};
use crate::common::error::SimError;

/// A 32-bit value written as a JSON number or a `0x`-prefixed hex string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Word {
    /// Plain number.
    Number(u32),
    /// Hex (`0x...`) or decimal string.
    Text(String),
}

impl Word {
    /// The numeric value.
    ///
    /// # Errors
    ///
    /// `Scenario` if the string is not a valid 32-bit number.
    pub fn value(&self) -> Result<u32, SimError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(text) => parse_u32(text),
        }
    }
}

impl From<u32> for Word {
    fn from(value: u32) -> Self {
        Self::Number(value)
    }
}

fn parse_u32(text: &str) -> Result<u32, SimError> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.map_err(|e| SimError::Scenario(format!("{text:?} is not a 32-bit value: {e}")))
}

/// A simulation scenario.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Scenario {
    /// Label for reports.
    #[serde(default)]
    pub name: String,
    /// Instruction stream. Values whose low two bits are not `11` are 16-bit parcels.
    pub program: Vec<Word>,
    /// Initial register values by index.
    #[serde(default)]
    pub regs: BTreeMap<String, Word>,
    /// Initial memory words by address.
    #[serde(default)]
    pub memory: BTreeMap<String, Word>,
    /// Instruction addresses whose offload is killed at commit.
    #[serde(default)]
    pub kill: Vec<Word>,
}

/// Scenario assembled for a given boot address.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadedScenario {
    /// Program bytes to place at the boot address.
    pub image: Vec<u8>,
    /// Address of every program entry, in order.
    pub addresses: Vec<u32>,
    /// `(register, value)` pairs.
    pub regs: Vec<(usize, u32)>,
    /// `(address, value)` pairs.
    pub memory: Vec<(u32, u32)>,
    /// Kill addresses.
    pub kill: Vec<u32>,
}

impl Scenario {
    /// Reads a scenario file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `Parse` if it is not valid scenario JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    ///
    /// `Parse` if `text` is not valid scenario JSON.
    pub fn from_json_str(text: &str) -> Result<Self, SimError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Builds a scenario from an instruction list.
    pub fn from_program(name: impl Into<String>, program: &[u32]) -> Self {
        Self {
            name: name.into(),
            program: program.iter().copied().map(Word::from).collect(),
            ..Self::default()
        }
    }

    /// Assembles the program at `boot_addr` and resolves every value.
    ///
    /// # Errors
    ///
    /// `Scenario` for unparsable values, register indices outside 0-31,
    /// unaligned memory addresses, or a parcel wider than 16 bits.
    pub fn assemble(&self, boot_addr: u32) -> Result<LoadedScenario, SimError> {
        let mut loaded = LoadedScenario::default();
        let mut addr = boot_addr;
        for word in &self.program {
            let value = word.value()?;
            loaded.addresses.push(addr);
            if is_compressed(value) {
                let parcel = u16::try_from(value).map_err(|_| {
                    SimError::Scenario(format!(
                        "{value:#x} at {addr:#010x} has 16-bit low bits but does not fit in 16 bits"
                    ))
                })?;
                loaded.image.extend_from_slice(&parcel.to_le_bytes());
                addr = addr.wrapping_add(INSTRUCTION_SIZE_16);
            } else {
                loaded.image.extend_from_slice(&value.to_le_bytes());
                addr = addr.wrapping_add(4);
            }
        }

        for (reg, value) in &self.regs {
            let idx = parse_u32(reg)? as usize;
            if idx >= NUM_REGS {
                return Err(SimError::Scenario(format!("register x{idx} does not exist")));
            }
            loaded.regs.push((idx, value.value()?));
        }

        for (addr, value) in &self.memory {
            let addr = parse_u32(addr)?;
            if addr % 4 != 0 {
                return Err(SimError::Scenario(format!(
                    "memory initializer at {addr:#010x} is not word aligned"
                )));
            }
            loaded.memory.push((addr, value.value()?));
        }

        loaded.kill = self
            .kill
            .iter()
            .map(Word::value)
            .collect::<Result<_, _>>()?;
        Ok(loaded)
    }
}
