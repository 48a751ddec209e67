//! テスト用のi8042モック

use super::port::{ControllerIo, Register, Stall};
use std::collections::VecDeque;
use std::vec::Vec;

/// 台本どおりのステータスとデータを返すコントローラ
///
/// ステータスの台本が尽きたら `idle_status` を返し続ける
pub struct MockController {
    idle_status: u8,
    statuses: VecDeque<u8>,
    data: VecDeque<u8>,
    writes: Vec<(Register, u8)>,
    status_reads: usize,
    data_reads: usize,
}

impl MockController {
    pub fn new(idle_status: u8) -> Self {
        Self {
            idle_status,
            statuses: VecDeque::new(),
            data: VecDeque::new(),
            writes: Vec::new(),
            status_reads: 0,
            data_reads: 0,
        }
    }

    pub fn push_status(&mut self, status: u8) {
        self.statuses.push_back(status);
    }

    pub fn push_data(&mut self, byte: u8) {
        self.data.push_back(byte);
    }

    pub fn writes(&self) -> &[(Register, u8)] {
        &self.writes
    }

    pub fn status_reads(&self) -> usize {
        self.status_reads
    }

    pub fn data_reads(&self) -> usize {
        self.data_reads
    }
}

impl ControllerIo for MockController {
    fn read_status(&mut self) -> u8 {
        self.status_reads += 1;
        self.statuses.pop_front().unwrap_or(self.idle_status)
    }

    fn read_data(&mut self) -> u8 {
        self.data_reads += 1;
        self.data.pop_front().unwrap_or(0)
    }

    fn write(&mut self, register: Register, value: u8) {
        self.writes.push((register, value));
    }
}

/// 停止回数を数えるだけのStall
#[derive(Debug, Default)]
pub struct MockStall {
    calls: u32,
    total_micros: u64,
}

impl MockStall {
    pub fn calls(&self) -> u32 {
        self.calls
    }

    pub fn total_micros(&self) -> u64 {
        self.total_micros
    }
}

impl Stall for MockStall {
    fn stall(&mut self, micros: u32) {
        self.calls += 1;
        self.total_micros += u64::from(micros);
    }
}
