//! Mock bus channel for driver tests
//!
//! Scripted, hardware-free [`BusChannel`] implementation. State lives
//! behind an `Arc<Mutex<..>>` so a test keeps one handle for assertions
//! while the driver owns a clone.

use reef_bus::{BusChannel, BusError, Result};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockState {
    /// Address most recently applied via `set_address`
    current: u16,
    /// Every successfully applied address, in order
    applied: Vec<u16>,
    /// Addresses whose `set_address` fails
    rejected: HashSet<u16>,
    /// Addresses that acknowledge probes without scripted data
    present: HashSet<u16>,
    /// Scripted reply frames per address, drained front to back
    replies: HashMap<u16, VecDeque<Vec<u8>>>,
    /// Raw frames written, with the address they targeted
    written: Vec<(u16, Vec<u8>)>,
    /// Fault every read regardless of address
    fault_all_reads: bool,
}

/// Mock bus channel
#[derive(Debug, Clone, Default)]
pub struct MockChannel {
    state: Arc<Mutex<MockState>>,
}

impl MockChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an address as acknowledging probes without scripted data
    pub fn set_present(&self, addr: u16) {
        self.state.lock().unwrap().present.insert(addr);
    }

    /// Queue a raw reply frame for an address
    pub fn add_reply(&self, addr: u16, frame: &[u8]) {
        self.state
            .lock()
            .unwrap()
            .replies
            .entry(addr)
            .or_default()
            .push_back(frame.to_vec());
    }

    /// Make `set_address` fail for an address
    pub fn reject_address(&self, addr: u16) {
        self.state.lock().unwrap().rejected.insert(addr);
    }

    /// Make every read fault regardless of address
    pub fn fault_all_reads(&self) {
        self.state.lock().unwrap().fault_all_reads = true;
    }

    /// The address the channel currently targets
    pub fn current_address(&self) -> u16 {
        self.state.lock().unwrap().current
    }

    /// Every successfully applied address, in order
    pub fn applied_addresses(&self) -> Vec<u16> {
        self.state.lock().unwrap().applied.clone()
    }

    /// Frames written so far, with the address each targeted
    pub fn written_frames(&self) -> Vec<(u16, Vec<u8>)> {
        self.state.lock().unwrap().written.clone()
    }
}

impl BusChannel for MockChannel {
    fn set_address(&mut self, addr: u16) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.rejected.contains(&addr) {
            return Err(BusError::address_rejected(addr, "mock rejection"));
        }
        state.current = addr;
        state.applied.push(addr);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let addr = state.current;
        state.written.push((addr, bytes.to_vec()));
        Ok(())
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut state = self.state.lock().unwrap();
        if state.fault_all_reads {
            return Err(BusError::transport("mock read fault"));
        }
        let addr = state.current;
        if let Some(frame) = state.replies.get_mut(&addr).and_then(|q| q.pop_front()) {
            let n = frame.len().min(buf.len());
            buf[..n].copy_from_slice(&frame[..n]);
            return Ok(n);
        }
        if state.present.contains(&addr) {
            // Acknowledges the probe but has no data queued.
            return Ok(buf.len().min(1));
        }
        Err(BusError::transport(format!("no ack from addr {}", addr)))
    }
}
