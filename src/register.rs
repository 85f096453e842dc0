//! Register map and bit-field layout of the LTR-329ALS/LTR-303ALS.
use num_enum::{IntoPrimitive, TryFromPrimitive};

#[derive(IntoPrimitive, Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub(crate) enum Register {
    AlsControl = 0x80,
    MeasRate = 0x85,
    PartId = 0x86,
    ManufacturerId = 0x87,
    /// Channel 1 low byte. Read all four data bytes in one transaction.
    Ch1Data0 = 0x88,
    Status = 0x8C,

    // LTR-303 only.
    Interrupt = 0x8F,
    ThresholdHigh0 = 0x97,
    ThresholdLow0 = 0x99,
    InterruptPersist = 0x9E,
}

/// A sub-range of bits within an 8-bit register.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct BitField {
    shift: u8,
    width: u8,
}

impl BitField {
    pub(crate) const fn new(shift: u8, width: u8) -> Self {
        Self { shift, width }
    }

    const fn mask(self) -> u8 {
        ((1u16 << self.width) - 1) as u8
    }

    /// Pull the field value out of a full register value.
    pub(crate) const fn extract(self, register: u8) -> u8 {
        (register >> self.shift) & self.mask()
    }

    /// Replace the field bits of `register` with `value`, truncated to the field width.
    pub(crate) const fn merge(self, register: u8, value: u8) -> u8 {
        let mask = self.mask() << self.shift;
        (register & !mask) | ((value << self.shift) & mask)
    }
}

// ALS_CONTR
pub(crate) const ACTIVE_MODE: BitField = BitField::new(0, 1);
pub(crate) const SW_RESET: BitField = BitField::new(1, 1);
pub(crate) const GAIN: BitField = BitField::new(2, 3);

// ALS_MEAS_RATE
pub(crate) const MEASUREMENT_RATE: BitField = BitField::new(0, 3);
pub(crate) const INTEGRATION_TIME: BitField = BitField::new(3, 3);

// ALS_STATUS
pub(crate) const DATA_READY: BitField = BitField::new(2, 1);
pub(crate) const DATA_INVALID: BitField = BitField::new(7, 1);

// INTERRUPT
pub(crate) const INTERRUPT_ENABLE: BitField = BitField::new(1, 1);
pub(crate) const INTERRUPT_POLARITY: BitField = BitField::new(2, 1);

// INTERRUPT_PERSIST
pub(crate) const PERSISTENCE: BitField = BitField::new(0, 4);

/// ADC gain applied to both channels.
#[derive(IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Gain {
    /// 1x gain, 1 lux to 64k lux.
    X1 = 0,
    /// 2x gain, 0.5 lux to 32k lux.
    X2 = 1,
    /// 4x gain, 0.25 lux to 16k lux.
    X4 = 2,
    /// 8x gain, 0.125 lux to 8k lux.
    X8 = 3,
    /// 48x gain, 0.02 lux to 1.3k lux.
    X48 = 6,
    /// 96x gain, 0.01 lux to 600 lux.
    X96 = 7,
}

impl Gain {
    /// The multiplication factor this gain code selects.
    pub const fn factor(self) -> u8 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
            Self::X8 => 8,
            Self::X48 => 48,
            Self::X96 => 96,
        }
    }
}

/// ADC integration time.
///
/// # Note
/// The codes are not ordered by duration. Longer integration times are more sensitive but must
/// not exceed the configured [`MeasurementRate`].
#[derive(IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum IntegrationTime {
    Ms100 = 0,
    Ms50 = 1,
    Ms200 = 2,
    Ms400 = 3,
    Ms150 = 4,
    Ms250 = 5,
    Ms300 = 6,
    Ms350 = 7,
}

impl IntegrationTime {
    pub const fn millis(self) -> u16 {
        match self {
            Self::Ms50 => 50,
            Self::Ms100 => 100,
            Self::Ms150 => 150,
            Self::Ms200 => 200,
            Self::Ms250 => 250,
            Self::Ms300 => 300,
            Self::Ms350 => 350,
            Self::Ms400 => 400,
        }
    }
}

/// Interval between the start of two consecutive measurements.
#[derive(IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum MeasurementRate {
    Ms50 = 0,
    Ms100 = 1,
    Ms200 = 2,
    Ms500 = 3,
    Ms1000 = 4,
    #[num_enum(alternatives = [6, 7])]
    Ms2000 = 5,
}

impl MeasurementRate {
    pub const fn millis(self) -> u16 {
        match self {
            Self::Ms50 => 50,
            Self::Ms100 => 100,
            Self::Ms200 => 200,
            Self::Ms500 => 500,
            Self::Ms1000 => 1000,
            Self::Ms2000 => 2000,
        }
    }
}
