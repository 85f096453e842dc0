//! Interrupt and threshold support of the LTR-303ALS.
use core::ops::{Deref, DerefMut};

use embedded_hal::i2c::I2c;

use crate::register::{self, BitField, Register};
use crate::{Error, Ltr329};

/// Active level of the INT pin.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum Polarity {
    ActiveLow,
    ActiveHigh,
}

/// The LTR-303ALS: an LTR-329ALS with a threshold interrupt output.
///
/// All [`Ltr329`] operations, including [`Ltr329::begin`], are available through `Deref`.
#[derive(Debug)]
pub struct Ltr303<T> {
    als: Ltr329<T>,
}

impl<T> Default for Ltr303<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Ltr303<T> {
    type Target = Ltr329<T>;

    fn deref(&self) -> &Self::Target {
        &self.als
    }
}

impl<T> DerefMut for Ltr303<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.als
    }
}

impl<T> Ltr303<T> {
    pub const fn new() -> Self {
        Self { als: Ltr329::new() }
    }

    pub fn into_inner(self) -> Ltr329<T> {
        self.als
    }
}

impl<T> Ltr303<T>
where
    T: I2c,
{
    /// Enable the INT output pin, or leave it inactive (high impedance).
    pub fn set_interrupt_enabled(&mut self, enabled: bool) -> Result<(), Error<T::Error>> {
        self.write_in_standby(register::INTERRUPT_ENABLE, enabled.into())
    }

    pub fn interrupt_enabled(&mut self) -> Result<bool, Error<T::Error>> {
        self.als.initialized()?;
        Ok(self
            .als
            .read_field(Register::Interrupt, register::INTERRUPT_ENABLE)?
            != 0)
    }

    pub fn set_interrupt_polarity(&mut self, polarity: Polarity) -> Result<(), Error<T::Error>> {
        let value = match polarity {
            Polarity::ActiveLow => 0,
            Polarity::ActiveHigh => 1,
        };
        self.write_in_standby(register::INTERRUPT_POLARITY, value)
    }

    pub fn interrupt_polarity(&mut self) -> Result<Polarity, Error<T::Error>> {
        self.als.initialized()?;
        match self
            .als
            .read_field(Register::Interrupt, register::INTERRUPT_POLARITY)?
        {
            0 => Ok(Polarity::ActiveLow),
            _ => Ok(Polarity::ActiveHigh),
        }
    }

    /// Set the lower interrupt threshold. Channel 0 readings below it trigger an interrupt.
    pub fn set_low_threshold(&mut self, value: u16) -> Result<(), Error<T::Error>> {
        self.als.initialized()?;
        self.als.write_reg_u16(Register::ThresholdLow0, value)
    }

    pub fn low_threshold(&mut self) -> Result<u16, Error<T::Error>> {
        self.als.initialized()?;
        self.als.read_reg_u16(Register::ThresholdLow0)
    }

    /// Set the upper interrupt threshold. Channel 0 readings above it trigger an interrupt.
    pub fn set_high_threshold(&mut self, value: u16) -> Result<(), Error<T::Error>> {
        self.als.initialized()?;
        self.als.write_reg_u16(Register::ThresholdHigh0, value)
    }

    pub fn high_threshold(&mut self) -> Result<u16, Error<T::Error>> {
        self.als.initialized()?;
        self.als.read_reg_u16(Register::ThresholdHigh0)
    }

    /// Set how many consecutive out-of-threshold readings (1 to 16) raise an interrupt.
    ///
    /// # Note
    /// The device stores `counts - 1` in four bits, so 0 wraps around to 16.
    pub fn set_interrupt_persistence(&mut self, counts: u8) -> Result<(), Error<T::Error>> {
        self.als.initialized()?;
        self.als.write_field(
            Register::InterruptPersist,
            register::PERSISTENCE,
            counts.wrapping_sub(1),
        )
    }

    pub fn interrupt_persistence(&mut self) -> Result<u8, Error<T::Error>> {
        self.als.initialized()?;
        Ok(self
            .als
            .read_field(Register::InterruptPersist, register::PERSISTENCE)?
            + 1)
    }

    /// Write an interrupt register field. The device only accepts these writes in standby.
    ///
    /// The previous mode is restored even if the field write fails, in which case the field
    /// write error is returned.
    fn write_in_standby(&mut self, field: BitField, value: u8) -> Result<(), Error<T::Error>> {
        let was_enabled = self.als.is_enabled()?;
        self.als.set_enabled(false)?;

        let written = self.als.write_field(Register::Interrupt, field, value);

        self.als.set_enabled(was_enabled)?;
        written
    }
}
