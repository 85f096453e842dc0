//! In-memory LTR-329/LTR-303 register file for driver tests.
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::DEFAULT_ADDR;

const ALS_CONTR: u8 = 0x80;

/// A single register write as observed on the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Write {
    pub register: u8,
    pub value: u8,
    /// State of the active mode bit when the write arrived.
    pub active: bool,
}

pub struct RegisterStore {
    registers: [u8; 256],
    pointer: u8,
    writes: Vec<Write>,

    /// Ignore writes to the active mode bit.
    pub stuck_in_standby: bool,
}

impl RegisterStore {
    /// A freshly powered device with correct identity registers.
    pub fn new() -> Self {
        let mut store = Self {
            registers: [0; 256],
            pointer: 0,
            writes: Vec::new(),
            stuck_in_standby: false,
        };
        store.registers[0x86] = 0xA0;
        store.registers[0x87] = 0x05;
        store.reset_defaults();
        store
    }

    pub fn set(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    pub fn get(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// Load the data registers, channel 1 first as on the device.
    pub fn set_channels(&mut self, ch0: u16, ch1: u16) {
        let [ch1_lsb, ch1_msb] = ch1.to_le_bytes();
        let [ch0_lsb, ch0_msb] = ch0.to_le_bytes();
        self.set(0x88, ch1_lsb);
        self.set(0x89, ch1_msb);
        self.set(0x8A, ch0_lsb);
        self.set(0x8B, ch0_msb);
    }

    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    fn reset_defaults(&mut self) {
        self.registers[ALS_CONTR as usize] = 0x00;
        self.registers[0x85] = 0x03;
        self.registers[0x8F] = 0x08;
        self.registers[0x97] = 0xFF;
        self.registers[0x98] = 0xFF;
        self.registers[0x99] = 0x00;
        self.registers[0x9A] = 0x00;
        self.registers[0x9E] = 0x00;
    }

    fn store(&mut self, register: u8, value: u8) {
        let control = self.registers[ALS_CONTR as usize];
        self.writes.push(Write {
            register,
            value,
            active: control & 0x01 != 0,
        });

        if register == ALS_CONTR {
            if value & 0x02 != 0 {
                self.reset_defaults();
                return;
            }
            if self.stuck_in_standby {
                self.registers[ALS_CONTR as usize] = value & !0x01;
                return;
            }
        }

        self.registers[register as usize] = value;
    }
}

impl ErrorType for RegisterStore {
    type Error = ErrorKind;
}

impl I2c for RegisterStore {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        if address != DEFAULT_ADDR {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }

        for operation in operations {
            match operation {
                Operation::Write(bytes) => {
                    let Some((register, data)) = bytes.split_first() else {
                        continue;
                    };
                    self.pointer = *register;
                    for byte in data {
                        self.store(self.pointer, *byte);
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
                Operation::Read(buffer) => {
                    for byte in buffer.iter_mut() {
                        *byte = self.registers[self.pointer as usize];
                        self.pointer = self.pointer.wrapping_add(1);
                    }
                }
            }
        }

        Ok(())
    }
}

/// Delay provider that only sums up the requested time.
#[derive(Default)]
pub struct RecordingDelay {
    pub total_ns: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
