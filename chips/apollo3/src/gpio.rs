// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! GPIO pad configuration.
//!
//! Only the pad multiplexer is covered here: enough to hand a pad over to a
//! peripheral function such as a CTIMER output.

use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{
    register_bitfields, register_structs, Field, ReadWrite, RegisterLongName,
};
use kernel::utilities::StaticRef;

pub const GPIO_BASE: StaticRef<GpioRegisters> =
    unsafe { StaticRef::new(0x4001_0000 as *const GpioRegisters) };

/// Number of pads on the package.
pub const NUM_PADS: usize = 50;

/// Pads configured by each PADREG and ALTPADCFG register, one byte each.
const PADS_PER_PADREG: usize = 4;
/// Pads configured by each CFG register, one nibble each.
const PADS_PER_CFG: usize = 8;

const PADKEY_UNLOCK: u32 = 0x73;

register_structs! {
    pub GpioRegisters {
        (0x000 => padreg: [ReadWrite<u32, PADREG::Register>; 13]),
        (0x034 => _reserved0),
        (0x040 => cfg: [ReadWrite<u32, CFG::Register>; 7]),
        (0x05C => _reserved1),
        (0x060 => padkey: ReadWrite<u32>),
        (0x064 => _reserved2),
        (0x0E0 => altpadcfg: [ReadWrite<u32, ALTPADCFG::Register>; 13]),
        (0x114 => @END),
    }
}

// Fields are given for the first pad of each register, the others repeat
// them at a fixed stride.
register_bitfields![u32,
    PADREG [
        PULL OFFSET(0) NUMBITS(1) [],
        INPEN OFFSET(1) NUMBITS(1) [],
        STRNG OFFSET(2) NUMBITS(1) [],
        FNCSEL OFFSET(3) NUMBITS(3) [],
        RSEL OFFSET(6) NUMBITS(2) []
    ],
    CFG [
        INCFG OFFSET(0) NUMBITS(1) [],
        OUTCFG OFFSET(1) NUMBITS(2) [
            Disable = 0,
            PushPull = 1,
            OpenDrain = 2,
            TriState = 3
        ],
        INTD OFFSET(3) NUMBITS(1) []
    ],
    ALTPADCFG [
        DS1 OFFSET(0) NUMBITS(1) [],
        SR OFFSET(4) NUMBITS(1) []
    ]
];

/// Output drive strength of a pad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriveStrength {
    Ma2 = 0b00,
    Ma4 = 0b01,
    Ma8 = 0b10,
    Ma12 = 0b11,
}

impl DriveStrength {
    /// Split into the STRNG (low) and DS1 (high) bits.
    fn bits(self) -> (u32, u32) {
        let value = self as u32;
        (value & 1, value >> 1)
    }

    fn from_bits(strng: u32, ds1: u32) -> DriveStrength {
        match (ds1 << 1) | strng {
            0b00 => DriveStrength::Ma2,
            0b01 => DriveStrength::Ma4,
            0b10 => DriveStrength::Ma8,
            _ => DriveStrength::Ma12,
        }
    }
}

/// Move a first-pad field to the slot of `pad`.
fn pad_field<R: RegisterLongName>(
    field: Field<u32, R>,
    pad: usize,
    per_register: usize,
) -> Field<u32, R> {
    let stride = 32 / per_register;
    Field::new(field.mask, field.shift + stride * (pad % per_register))
}

pub struct GpioPads {
    registers: StaticRef<GpioRegisters>,
}

impl GpioPads {
    pub const fn new(base: StaticRef<GpioRegisters>) -> GpioPads {
        GpioPads { registers: base }
    }

    fn padreg(&self, pad: usize) -> &ReadWrite<u32, PADREG::Register> {
        &self.registers.padreg[pad / PADS_PER_PADREG]
    }

    fn altpadcfg(&self, pad: usize) -> &ReadWrite<u32, ALTPADCFG::Register> {
        &self.registers.altpadcfg[pad / PADS_PER_PADREG]
    }

    fn cfg(&self, pad: usize) -> &ReadWrite<u32, CFG::Register> {
        &self.registers.cfg[pad / PADS_PER_CFG]
    }

    /// Hand `pad` to alternate function `funcsel` as a push-pull output
    /// with the given drive strength.
    pub fn configure_function(&self, pad: usize, funcsel: u8, drive: DriveStrength) {
        assert!(pad < NUM_PADS, "pad {} out of range", pad);
        let (strng, ds1) = drive.bits();

        // Pad registers only accept writes while the key is held.
        self.registers.padkey.set(PADKEY_UNLOCK);

        self.padreg(pad).modify(
            pad_field(PADREG::FNCSEL, pad, PADS_PER_PADREG).val(funcsel as u32)
                + pad_field(PADREG::STRNG, pad, PADS_PER_PADREG).val(strng)
                + pad_field(PADREG::INPEN, pad, PADS_PER_PADREG).val(0),
        );
        self.altpadcfg(pad)
            .modify(pad_field(ALTPADCFG::DS1, pad, PADS_PER_PADREG).val(ds1));
        self.cfg(pad).modify(
            pad_field(CFG::OUTCFG, pad, PADS_PER_CFG).val(CFG::OUTCFG::Value::PushPull as u32)
                + pad_field(CFG::INCFG, pad, PADS_PER_CFG).val(0),
        );

        self.registers.padkey.set(0);
    }

    /// The function currently selected on `pad`.
    pub fn function(&self, pad: usize) -> u8 {
        self.padreg(pad)
            .read(pad_field(PADREG::FNCSEL, pad, PADS_PER_PADREG)) as u8
    }

    pub fn drive_strength(&self, pad: usize) -> DriveStrength {
        let strng = self
            .padreg(pad)
            .read(pad_field(PADREG::STRNG, pad, PADS_PER_PADREG));
        let ds1 = self
            .altpadcfg(pad)
            .read(pad_field(ALTPADCFG::DS1, pad, PADS_PER_PADREG));
        DriveStrength::from_bits(strng, ds1)
    }

    pub fn is_push_pull(&self, pad: usize) -> bool {
        self.cfg(pad).read(pad_field(CFG::OUTCFG, pad, PADS_PER_CFG))
            == CFG::OUTCFG::Value::PushPull as u32
    }
}
