//! A platform agnostic Rust driver for the Lite-On LTR-329ALS-01 and LTR-303ALS-01 ambient light
//! sensors based on the [`embedded-hal`](https://github.com/rust-embedded/embedded-hal) traits.
//!
//! ## Overview
//!
//! The LTR-329ALS and LTR-303ALS are low-voltage dual-channel light sensors with an I2C
//! interface. Channel 0 measures visible and infrared light, channel 1 measures infrared light
//! only. The LTR-303 additionally provides a threshold interrupt output pin, which is configured
//! through [`Ltr303`].
//!
//! ## Usage
//!
//! ### Creation
//!
//! Import the crate and the `embedded-hal` implementation to bring up the device:
//! ```no_run
//! use linux_embedded_hal as hal;
//!
//! use hal::{Delay, I2cdev};
//! use ltr329::Ltr329;
//!
//! # fn main() {
//! let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! let mut ltr329 = Ltr329::new();
//! ltr329.begin(dev, &mut Delay).unwrap();
//! # }
//! ```
//!
//! ### Measurement
//! The sensor measures continuously once enabled. Poll for new data and read both channels:
//!
//!```no_run
//! use linux_embedded_hal as hal;
//!
//! use hal::{Delay, I2cdev};
//! use embedded_hal::delay::DelayNs;
//! use ltr329::{Gain, IntegrationTime, Ltr329, MeasurementRate};
//!
//! # fn main() {
//! # let dev = I2cdev::new("/dev/i2c-1").unwrap();
//! # let mut ltr329 = Ltr329::new();
//! # ltr329.begin(dev, &mut Delay).unwrap();
//! ltr329.set_gain(Gain::X2).unwrap();
//! ltr329.set_integration_time(IntegrationTime::Ms100).unwrap();
//! ltr329.set_measurement_rate(MeasurementRate::Ms200).unwrap();
//!
//! loop {
//!     if ltr329.has_new_data().unwrap() {
//!         let channels = ltr329.read_both_channels().unwrap();
//!         if channels.valid {
//!             println!("Visible+IR: {}, IR: {}", channels.ch0, channels.ch1);
//!         }
//!     }
//!
//!     Delay.delay_ms(100u32);
//! }
//! # }
//! ```
#![cfg_attr(not(test), no_std)]
use embedded_hal::{delay::DelayNs, i2c::I2c};

mod ltr303;
mod register;

#[cfg(test)]
mod fake;

pub use ltr303::{Ltr303, Polarity};
pub use register::{Gain, IntegrationTime, MeasurementRate};

use register::{BitField, Register};

/// The I2C address of the device. It is not configurable.
pub const DEFAULT_ADDR: u8 = 0x29;

/// Expected contents of the part ID register.
const PART_ID: u8 = 0xA0;

/// Expected contents of the manufacturer ID register.
const MANUFACTURER_ID: u8 = 0x05;

/// Returned by [`Ltr329::read_visible_light`] when the device flagged the sample as invalid.
pub const INVALID_READING: u16 = 0xFFFF;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Error<T> {
    /// An error with the usage of the I2C interface occurred.
    Interface(T),

    /// The driver was used before [`Ltr329::begin`] completed successfully.
    NotInitialized,

    /// The part ID register did not identify an LTR-329/LTR-303.
    PartId(u8),

    /// The manufacturer ID register did not identify Lite-On.
    ManufacturerId(u8),

    /// The device did not report active mode after being enabled.
    NotActive,

    /// A register field held a code that is reserved by the datasheet.
    InvalidField(u8),
}

impl<T> From<T> for Error<T> {
    fn from(e: T) -> Self {
        Self::Interface(e)
    }
}

/// Raw ADC counts of both channels.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct Channels {
    /// Visible and infrared light.
    pub ch0: u16,

    /// Infrared light only.
    pub ch1: u16,

    /// False if the device flagged the conversion as invalid (ADC overrun).
    pub valid: bool,
}

/// Status register bits cached once the device has been brought up.
#[derive(Debug, Copy, Clone)]
struct StatusRegister {
    data_ready: BitField,
    data_invalid: BitField,
}

impl StatusRegister {
    const REGISTER: Register = Register::Status;

    const fn new() -> Self {
        Self {
            data_ready: register::DATA_READY,
            data_invalid: register::DATA_INVALID,
        }
    }
}

#[derive(Debug)]
pub struct Ltr329<T> {
    addr: u8,
    device: Option<T>,
    status: Option<StatusRegister>,
}

impl<T> Default for Ltr329<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Ltr329<T> {
    /// Construct a driver that is not yet bound to a bus. Call [`Ltr329::begin`] before use.
    pub const fn new() -> Self {
        Self {
            addr: DEFAULT_ADDR,
            device: None,
            status: None,
        }
    }

    /// Check whether [`Ltr329::begin`] has completed successfully.
    pub fn is_initialized(&self) -> bool {
        self.device.is_some() && self.status.is_some()
    }

    /// Hand back the bus, leaving the driver uninitialized.
    pub fn release(&mut self) -> Option<T> {
        self.status = None;
        self.device.take()
    }

    /// Consume the driver and return the bus, if any.
    pub fn destroy(self) -> Option<T> {
        self.device
    }
}

impl<T> Ltr329<T>
where
    T: I2c,
{
    /// Bind the driver to `device`, verify the chip identity, reset it and enable measurements.
    ///
    /// # Note
    /// Any bus previously held by the driver is dropped first. On failure the new bus is kept
    /// (see [`Ltr329::release`]) but every other operation keeps returning
    /// [`Error::NotInitialized`].
    pub fn begin(
        &mut self,
        device: T,
        delay: &mut impl DelayNs,
    ) -> Result<(), Error<T::Error>> {
        // Release the previous bus before binding the new one.
        self.status = None;
        self.device = None;
        self.device = Some(device);

        // The ID read doubles as the presence check: an absent device NACKs here.
        let part_id = self.read_reg(Register::PartId)?;
        if part_id != PART_ID {
            #[cfg(feature = "defmt-03")]
            defmt::warn!("ltr329: unexpected part ID {=u8:#x}", part_id);
            return Err(Error::PartId(part_id));
        }

        let manufacturer_id = self.read_reg(Register::ManufacturerId)?;
        if manufacturer_id != MANUFACTURER_ID {
            #[cfg(feature = "defmt-03")]
            defmt::warn!("ltr329: unexpected manufacturer ID {=u8:#x}", manufacturer_id);
            return Err(Error::ManufacturerId(manufacturer_id));
        }

        self.soft_reset(delay)?;

        self.write_field(Register::AlsControl, register::ACTIVE_MODE, 1)?;
        if self.read_field(Register::AlsControl, register::ACTIVE_MODE)? == 0 {
            #[cfg(feature = "defmt-03")]
            defmt::warn!("ltr329: device did not enter active mode");
            return Err(Error::NotActive);
        }

        #[cfg(feature = "defmt-03")]
        defmt::debug!("ltr329: device ready");

        self.status = Some(StatusRegister::new());
        Ok(())
    }

    /// Issue a soft reset and wait for the device to come back.
    pub fn reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<T::Error>> {
        self.initialized()?;
        self.soft_reset(delay)
    }

    /// Read the part ID register. The upper nibble is the part number, the lower the revision.
    pub fn part_id(&mut self) -> Result<u8, Error<T::Error>> {
        self.initialized()?;
        self.read_reg(Register::PartId)
    }

    pub fn manufacturer_id(&mut self) -> Result<u8, Error<T::Error>> {
        self.initialized()?;
        self.read_reg(Register::ManufacturerId)
    }

    /// Switch between active mode (measuring) and standby.
    ///
    /// # Note
    /// The device may ignore the write, use [`Ltr329::is_enabled`] to confirm the state.
    pub fn set_enabled(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        self.initialized()?;
        self.write_field(Register::AlsControl, register::ACTIVE_MODE, enabled.into())
    }

    pub fn is_enabled(&mut self) -> Result<bool, Error<T::Error>> {
        self.initialized()?;
        Ok(self.read_field(Register::AlsControl, register::ACTIVE_MODE)? != 0)
    }

    pub fn set_gain(&mut self, gain: Gain) -> Result<(), Error<T::Error>> {
        self.initialized()?;
        self.write_field(Register::AlsControl, register::GAIN, gain.into())
    }

    pub fn gain(&mut self) -> Result<Gain, Error<T::Error>> {
        self.initialized()?;
        let code = self.read_field(Register::AlsControl, register::GAIN)?;
        Gain::try_from(code).map_err(|_| Error::InvalidField(code))
    }

    /// Set the ADC integration time. Longer times are more sensitive but take longer to read.
    pub fn set_integration_time(&mut self, time: IntegrationTime) -> Result<(), Error<T::Error>> {
        self.initialized()?;
        self.write_field(Register::MeasRate, register::INTEGRATION_TIME, time.into())
    }

    pub fn integration_time(&mut self) -> Result<IntegrationTime, Error<T::Error>> {
        self.initialized()?;
        let code = self.read_field(Register::MeasRate, register::INTEGRATION_TIME)?;
        IntegrationTime::try_from(code).map_err(|_| Error::InvalidField(code))
    }

    /// Set the measurement repeat rate.
    ///
    /// # Note
    /// The rate must be at least as long as the integration time, slower rates lower the power
    /// consumption.
    pub fn set_measurement_rate(&mut self, rate: MeasurementRate) -> Result<(), Error<T::Error>> {
        self.initialized()?;
        self.write_field(Register::MeasRate, register::MEASUREMENT_RATE, rate.into())
    }

    pub fn measurement_rate(&mut self) -> Result<MeasurementRate, Error<T::Error>> {
        self.initialized()?;
        let code = self.read_field(Register::MeasRate, register::MEASUREMENT_RATE)?;
        MeasurementRate::try_from(code).map_err(|_| Error::InvalidField(code))
    }

    /// Check if a new, not yet read measurement is available.
    pub fn has_new_data(&mut self) -> Result<bool, Error<T::Error>> {
        let status = self.initialized()?;
        Ok(self.read_field(StatusRegister::REGISTER, status.data_ready)? != 0)
    }

    /// Read both channels in a single transaction.
    ///
    /// # Note
    /// The validity flag is read after the data, so it reflects the device state at that point
    /// rather than the exact sample returned.
    pub fn read_both_channels(&mut self) -> Result<Channels, Error<T::Error>> {
        let status = self.initialized()?;

        let both = self.read_reg_u32(Register::Ch1Data0)?;
        let invalid = self.read_field(StatusRegister::REGISTER, status.data_invalid)? != 0;

        Ok(Channels {
            ch0: (both >> 16) as u16,
            ch1: (both & 0xFFFF) as u16,
            valid: !invalid,
        })
    }

    /// Read the visible light component: channel 0 minus channel 1.
    ///
    /// Returns [`INVALID_READING`] if the device flagged the sample as invalid. The subtraction
    /// wraps if the infrared reading exceeds the combined one.
    pub fn read_visible_light(&mut self) -> Result<u16, Error<T::Error>> {
        let channels = self.read_both_channels()?;
        if !channels.valid {
            return Ok(INVALID_READING);
        }

        Ok(channels.ch0.wrapping_sub(channels.ch1))
    }

    pub(crate) fn initialized(&self) -> Result<StatusRegister, Error<T::Error>> {
        match (&self.device, self.status) {
            (Some(_), Some(status)) => Ok(status),
            _ => Err(Error::NotInitialized),
        }
    }

    fn soft_reset(&mut self, delay: &mut impl DelayNs) -> Result<(), Error<T::Error>> {
        self.write_field(Register::AlsControl, register::SW_RESET, 1)?;

        // The datasheet does not give a reset time, 10ms is ample for the reset to complete.
        delay.delay_ms(10);
        Ok(())
    }

    fn bus(&mut self) -> Result<&mut T, Error<T::Error>> {
        self.device.as_mut().ok_or(Error::NotInitialized)
    }

    pub(crate) fn read_field(
        &mut self,
        register: Register,
        field: BitField,
    ) -> Result<u8, Error<T::Error>> {
        Ok(field.extract(self.read_reg(register)?))
    }

    pub(crate) fn write_field(
        &mut self,
        register: Register,
        field: BitField,
        value: u8,
    ) -> Result<(), Error<T::Error>> {
        let current = self.read_reg(register)?;
        self.write_reg(register, field.merge(current, value))
    }

    fn write_reg(&mut self, reg: Register, value: u8) -> Result<(), Error<T::Error>> {
        let addr = self.addr;
        self.bus()?.write(addr, &[reg.into(), value])?;
        Ok(())
    }

    pub(crate) fn write_reg_u16(
        &mut self,
        reg: Register,
        value: u16,
    ) -> Result<(), Error<T::Error>> {
        let addr = self.addr;
        let [lsb, msb] = value.to_le_bytes();
        self.bus()?.write(addr, &[reg.into(), lsb, msb])?;
        Ok(())
    }

    fn read_reg(&mut self, register: Register) -> Result<u8, Error<T::Error>> {
        let addr = self.addr;
        let mut result = [0u8; 1];
        self.bus()?
            .write_read(addr, &[register.into()], &mut result[..])?;
        Ok(result[0])
    }

    pub(crate) fn read_reg_u16(&mut self, register: Register) -> Result<u16, Error<T::Error>> {
        let addr = self.addr;
        let mut bytes = [0u8; 2];
        self.bus()?
            .write_read(addr, &[register.into()], &mut bytes[..])?;
        Ok(u16::from_le_bytes(bytes))
    }

    fn read_reg_u32(&mut self, register: Register) -> Result<u32, Error<T::Error>> {
        let addr = self.addr;
        let mut bytes = [0u8; 4];
        self.bus()?
            .write_read(addr, &[register.into()], &mut bytes[..])?;
        Ok(u32::from_le_bytes(bytes))
    }
}
