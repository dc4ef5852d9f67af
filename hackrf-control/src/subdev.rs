//! Sub-device handles: the MAX2837 transceiver IC, the SI5351C clock
//! generator, and the RFFC5071 mixer/synthesizer, plus the SPI flash
//! accessor.
//!
//! The session constructs the three register handles after a successful
//! open, in the order mixer, synthesizer, filter. Their register maps are
//! not modeled here; each handle is raw register passthrough with the
//! address/value guards the device enforces.

use std::ops::Range;
use std::sync::Arc;

use crate::error::Error;
use crate::proto::Request;
use crate::transport::{ControlTransport, exchange};

fn read_u16<T: ControlTransport>(transport: &T, req: &Request) -> Result<u16, Error> {
    let resp = exchange(transport, req)?;
    let raw: [u8; 2] = resp.as_slice().try_into().map_err(|_| Error::ShortTransfer {
        expected: 2,
        actual: resp.len(),
    })?;
    Ok(u16::from_le_bytes(raw))
}

/// Register access to the MAX2837 transceiver IC.
pub struct Max2837<T: ControlTransport> {
    transport: Arc<T>,
}

impl<T: ControlTransport> Max2837<T> {
    const ADDR_RANGE: Range<u32> = 0..32;
    const VALUE_RANGE: Range<u32> = 0..0x400;

    pub(crate) fn attach(transport: Arc<T>) -> Result<Self, Error> {
        Ok(Self { transport })
    }

    /// Read a register. Registers are 10-bit, addressed 0-31.
    pub fn read(&self, register: u8) -> Result<u16, Error> {
        if !Self::ADDR_RANGE.contains(&(register as u32)) {
            return Err(Error::AddressRange {
                range: Self::ADDR_RANGE,
                addr: register as u32,
            });
        }
        read_u16(&*self.transport, &Request::max2837_read(register))
    }

    /// Write a register. Values are 10-bit.
    pub fn write(&self, register: u8, value: u16) -> Result<(), Error> {
        if !Self::ADDR_RANGE.contains(&(register as u32)) {
            return Err(Error::AddressRange {
                range: Self::ADDR_RANGE,
                addr: register as u32,
            });
        }
        if !Self::VALUE_RANGE.contains(&(value as u32)) {
            return Err(Error::ValueRange {
                range: Self::VALUE_RANGE,
                val: value as u32,
            });
        }
        exchange(&*self.transport, &Request::max2837_write(register, value))?;
        Ok(())
    }
}

/// Register access to the SI5351C clock generator.
pub struct Si5351c<T: ControlTransport> {
    transport: Arc<T>,
}

impl<T: ControlTransport> Si5351c<T> {
    pub(crate) fn attach(transport: Arc<T>) -> Result<Self, Error> {
        Ok(Self { transport })
    }

    /// Read a register.
    pub fn read(&self, register: u8) -> Result<u8, Error> {
        let resp = exchange(&*self.transport, &Request::si5351c_read(register))?;
        resp.first().copied().ok_or(Error::ShortTransfer {
            expected: 1,
            actual: 0,
        })
    }

    /// Write a register.
    pub fn write(&self, register: u8, value: u8) -> Result<(), Error> {
        exchange(&*self.transport, &Request::si5351c_write(register, value))?;
        Ok(())
    }
}

/// Register access to the RFFC5071 mixer/synthesizer.
pub struct Rffc5071<T: ControlTransport> {
    transport: Arc<T>,
}

impl<T: ControlTransport> Rffc5071<T> {
    const ADDR_RANGE: Range<u32> = 0..31;

    pub(crate) fn attach(transport: Arc<T>) -> Result<Self, Error> {
        Ok(Self { transport })
    }

    /// Read a register. Registers are addressed 0-30.
    pub fn read(&self, register: u8) -> Result<u16, Error> {
        if !Self::ADDR_RANGE.contains(&(register as u32)) {
            return Err(Error::AddressRange {
                range: Self::ADDR_RANGE,
                addr: register as u32,
            });
        }
        read_u16(&*self.transport, &Request::rffc5071_read(register))
    }

    /// Write a register.
    pub fn write(&self, register: u8, value: u16) -> Result<(), Error> {
        if !Self::ADDR_RANGE.contains(&(register as u32)) {
            return Err(Error::AddressRange {
                range: Self::ADDR_RANGE,
                addr: register as u32,
            });
        }
        exchange(&*self.transport, &Request::rffc5071_write(register, value))?;
        Ok(())
    }
}

/// Accessor for the onboard SPI flash.
///
/// The general write procedure is to [`erase`][Self::erase] the flash,
/// [`write`][Self::write] all bytes starting from address 0, then verify by
/// [`read`][Self::read]ing them back. A half-written flash soft-bricks the
/// board until new firmware is written.
pub struct SpiFlash<'a, T: ControlTransport> {
    transport: &'a T,
}

impl<'a, T: ControlTransport> SpiFlash<'a, T> {
    const END_ADDR: u32 = 0x10_0000;

    pub(crate) fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    fn check_span(addr: u32, len: usize) -> Result<(), Error> {
        if addr >= Self::END_ADDR {
            return Err(Error::AddressRange {
                range: 0..Self::END_ADDR,
                addr,
            });
        }
        if len + addr as usize > Self::END_ADDR as usize {
            return Err(Error::ValueRange {
                range: 0..(Self::END_ADDR - addr),
                val: len as u32,
            });
        }
        Ok(())
    }

    /// Erase the entire flash memory.
    pub fn erase(&self) -> Result<(), Error> {
        exchange(self.transport, &Request::spiflash_erase())?;
        Ok(())
    }

    /// Write firmware bytes starting at `addr`, splitting into 256-byte
    /// pages as the device requires.
    pub fn write(&self, addr: u32, data: &[u8]) -> Result<(), Error> {
        Self::check_span(addr, data.len())?;

        let mut addr = addr;
        let mut data = data;
        let mut chunk: &[u8];
        while !data.is_empty() {
            // Keep every write within a 256-byte page.
            let len = (0x100 - ((addr & 0xff) as usize)).min(data.len());
            (chunk, data) = data.split_at(len);
            exchange(self.transport, &Request::spiflash_write(addr, chunk.to_vec()))?;
            addr += len as u32;
        }
        Ok(())
    }

    /// Read `len` bytes starting at `addr`, one 256-byte page at a time.
    pub fn read(&self, addr: u32, len: usize) -> Result<Vec<u8>, Error> {
        Self::check_span(addr, len)?;

        let mut addr = addr;
        let mut data = Vec::with_capacity(len);
        while data.len() < len {
            let block_len = (0x100 - ((addr & 0xff) as usize)).min(len - data.len());
            let resp = exchange(
                self.transport,
                &Request::spiflash_read(addr, block_len as u16),
            )?;
            if resp.is_empty() {
                return Err(Error::ShortTransfer {
                    expected: block_len,
                    actual: 0,
                });
            }
            addr += resp.len() as u32;
            data.extend_from_slice(&resp);
        }
        Ok(data)
    }
}
