// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Counter/Timer (CTIMER) driver.
//!
//! The CTIMER block holds eight 32-bit timers. Each one can run as two
//! independent 16-bit halves, segment A (low half) and segment B (high
//! half), each with its own clock, function and compare registers. Timer
//! outputs reach pads through the OUTCFG routing fabric described in
//! [`crate::ctimer_routing`].
//!
//! Drivers built on top of the timers talk to it through the
//! [`CtimerControl`] trait, so they never address registers directly.

use kernel::utilities::registers::interfaces::{ReadWriteable, Readable, Writeable};
use kernel::utilities::registers::{register_bitfields, register_structs, Field, ReadWrite};
use kernel::utilities::StaticRef;
use kernel::ErrorCode;

use crate::ctimer_routing::{self, OutputConfig};
use crate::gpio::{DriveStrength, GpioPads};

pub const CTIMER_BASE: StaticRef<CtimerRegisters> =
    unsafe { StaticRef::new(0x4000_8000 as *const CtimerRegisters) };

/// Number of timers in the block.
pub const NUM_TIMERS: usize = 8;

register_structs! {
    pub TimerRegisters {
        /// Counter values, segment A in the low half
        (0x00 => tmr: ReadWrite<u32, TMR::Register>),
        (0x04 => cmpra: ReadWrite<u32, CMPR::Register>),
        (0x08 => cmprb: ReadWrite<u32, CMPR::Register>),
        (0x0C => ctrl: ReadWrite<u32, CTRL::Register>),
        (0x10 => _reserved0),
        (0x14 => cmprauxa: ReadWrite<u32, CMPR::Register>),
        (0x18 => cmprauxb: ReadWrite<u32, CMPR::Register>),
        (0x1C => aux: ReadWrite<u32>),
        (0x20 => @END),
    },

    pub CtimerRegisters {
        (0x000 => timers: [TimerRegisters; NUM_TIMERS]),
        (0x100 => globen: ReadWrite<u32>),
        (0x104 => outcfg0: ReadWrite<u32, OUTCFG::Register>),
        (0x108 => outcfg1: ReadWrite<u32, OUTCFG::Register>),
        (0x10C => outcfg2: ReadWrite<u32, OUTCFG::Register>),
        (0x110 => _reserved0),
        (0x114 => outcfg3: ReadWrite<u32, OUTCFG::Register>),
        (0x118 => incfg: ReadWrite<u32>),
        (0x11C => @END),
    }
}

register_bitfields![u32,
    TMR [
        CTTMRA OFFSET(0) NUMBITS(16) [],
        CTTMRB OFFSET(16) NUMBITS(16) []
    ],
    CMPR [
        CMPR0 OFFSET(0) NUMBITS(16) [],
        CMPR1 OFFSET(16) NUMBITS(16) []
    ],
    CTRL [
        TMRAEN OFFSET(0) NUMBITS(1) [],
        TMRACLK OFFSET(1) NUMBITS(5) [],
        TMRAFN OFFSET(6) NUMBITS(3) [],
        TMRAIE0 OFFSET(9) NUMBITS(1) [],
        TMRAIE1 OFFSET(10) NUMBITS(1) [],
        TMRACLR OFFSET(11) NUMBITS(1) [],
        TMRAPOL OFFSET(12) NUMBITS(1) [],
        TMRBEN OFFSET(16) NUMBITS(1) [],
        TMRBCLK OFFSET(17) NUMBITS(5) [],
        TMRBFN OFFSET(22) NUMBITS(3) [],
        TMRBIE0 OFFSET(25) NUMBITS(1) [],
        TMRBIE1 OFFSET(26) NUMBITS(1) [],
        TMRBCLR OFFSET(27) NUMBITS(1) [],
        TMRBPOL OFFSET(28) NUMBITS(1) [],
        CTLINK OFFSET(31) NUMBITS(1) []
    ],
    /// Ten 3-bit selectors per register, one per CTx signal
    OUTCFG [
        CFG0 OFFSET(0) NUMBITS(3) []
    ]
];

/// CTx signals configured by each OUTCFG register.
const CTX_PER_OUTCFG: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerNumber {
    Timer0,
    Timer1,
    Timer2,
    Timer3,
    Timer4,
    Timer5,
    Timer6,
    Timer7,
}

impl TimerNumber {
    pub const fn from_index(index: u8) -> TimerNumber {
        match index {
            0 => TimerNumber::Timer0,
            1 => TimerNumber::Timer1,
            2 => TimerNumber::Timer2,
            3 => TimerNumber::Timer3,
            4 => TimerNumber::Timer4,
            5 => TimerNumber::Timer5,
            6 => TimerNumber::Timer6,
            7 => TimerNumber::Timer7,
            _ => panic!("CTIMER number out of range"),
        }
    }

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One 16-bit half of a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Segment {
    A,
    B,
}

/// The two output taps of a timer segment, OUT and OUT2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputSlot {
    Primary,
    Secondary,
}

/// What a CTx signal is driven with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    /// The segment's OUT tap
    Normal,
    /// The segment's OUT2 tap
    Secondary,
    /// Held low
    Force0,
    /// Held high
    Force1,
}

impl From<OutputSlot> for OutputType {
    fn from(slot: OutputSlot) -> OutputType {
        match slot {
            OutputSlot::Primary => OutputType::Normal,
            OutputSlot::Secondary => OutputType::Secondary,
        }
    }
}

/// Counter/timer function (TMRxFN).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum TimerFunction {
    /// Count once to the compare value, then hold the output level
    Once = 0,
    /// Periodic single-clock pulses
    Repeat = 1,
    /// One pulse of programmed width
    PwmOnce = 2,
    /// Rectangular waveform with programmed high and low widths
    PwmRepeat = 3,
    PatternOnce = 4,
    PatternRepeat = 5,
    /// Free running, single output level change
    Continuous = 6,
    /// Repeated pulse alternating between two width settings
    PwmAlternate = 7,
}

/// Counter clock source (TMRxCLK).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockSelect {
    Pin = 0x00,
    Hfrc12MHz = 0x01,
    Hfrc3MHz = 0x02,
    Hfrc187_5kHz = 0x03,
    Hfrc47kHz = 0x04,
    Hfrc12kHz = 0x05,
    Xt32_768kHz = 0x06,
    Xt16_384kHz = 0x07,
    Xt2_048kHz = 0x08,
    Xt256Hz = 0x09,
    Lfrc512Hz = 0x0A,
    Lfrc32Hz = 0x0B,
    Lfrc1Hz = 0x0C,
    Lfrc1_16Hz = 0x0D,
    Rtc100Hz = 0x0E,
    HclkDiv4 = 0x0F,
    XtDiv4 = 0x10,
    XtDiv8 = 0x11,
    XtDiv32 = 0x12,
}

/// The control fields that belong to one segment.
struct SegmentCtrl {
    en: Field<u32, CTRL::Register>,
    clk: Field<u32, CTRL::Register>,
    function: Field<u32, CTRL::Register>,
    ie0: Field<u32, CTRL::Register>,
    ie1: Field<u32, CTRL::Register>,
    clr: Field<u32, CTRL::Register>,
    pol: Field<u32, CTRL::Register>,
}

impl Segment {
    fn ctrl(self) -> SegmentCtrl {
        match self {
            Segment::A => SegmentCtrl {
                en: CTRL::TMRAEN,
                clk: CTRL::TMRACLK,
                function: CTRL::TMRAFN,
                ie0: CTRL::TMRAIE0,
                ie1: CTRL::TMRAIE1,
                clr: CTRL::TMRACLR,
                pol: CTRL::TMRAPOL,
            },
            Segment::B => SegmentCtrl {
                en: CTRL::TMRBEN,
                clk: CTRL::TMRBCLK,
                function: CTRL::TMRBFN,
                ie0: CTRL::TMRBIE0,
                ie1: CTRL::TMRBIE1,
                clr: CTRL::TMRBCLR,
                pol: CTRL::TMRBPOL,
            },
        }
    }
}

/// Primitive timer operations used by drivers layered on the CTIMER.
pub trait CtimerControl {
    /// Replace the configuration of one segment with `function` counting
    /// `clock`. The segment is left disabled with interrupts and output
    /// inversion off.
    fn configure(
        &self,
        timer: TimerNumber,
        segment: Segment,
        function: TimerFunction,
        clock: ClockSelect,
    );

    /// Release the segment from clear and let it count.
    fn start(&self, timer: TimerNumber, segment: Segment);

    /// Stop counting. The counter value is kept.
    fn stop(&self, timer: TimerNumber, segment: Segment);

    /// Hold the segment's counter at zero.
    fn clear(&self, timer: TimerNumber, segment: Segment);

    /// Program the period and on-time of a repeated-pulse segment, both in
    /// counter ticks. `on_time` larger than `period` is written as is.
    fn set_period(&self, timer: TimerNumber, segment: Segment, period: u32, on_time: u32);

    /// Route a segment output onto `pad` and set the pad up to drive it.
    ///
    /// Fails with `INVAL` if the pad has no CTx signal, or if the routing
    /// fabric cannot connect the requested output to that signal.
    fn configure_output(
        &self,
        timer: TimerNumber,
        segment: Segment,
        pad: usize,
        output: OutputType,
        drive: DriveStrength,
    ) -> Result<(), ErrorCode>;
}

pub struct Ctimer<'a> {
    registers: StaticRef<CtimerRegisters>,
    pads: &'a GpioPads,
}

impl<'a> Ctimer<'a> {
    pub const fn new(base: StaticRef<CtimerRegisters>, pads: &'a GpioPads) -> Ctimer<'a> {
        Ctimer {
            registers: base,
            pads,
        }
    }

    fn timer(&self, timer: TimerNumber) -> &TimerRegisters {
        &self.registers.timers[timer.index()]
    }

    fn outcfg(&self, ctx: usize) -> &ReadWrite<u32, OUTCFG::Register> {
        match ctx / CTX_PER_OUTCFG {
            0 => &self.registers.outcfg0,
            1 => &self.registers.outcfg1,
            2 => &self.registers.outcfg2,
            _ => &self.registers.outcfg3,
        }
    }

    fn set_outcfg(&self, ctx: usize, value: u32) {
        let shift = OUTCFG::CFG0.shift + 3 * (ctx % CTX_PER_OUTCFG);
        let field = Field::<u32, OUTCFG::Register>::new(OUTCFG::CFG0.mask, shift);
        self.outcfg(ctx).modify(field.val(value));
    }

    /// Read the current counter value of a segment.
    pub fn counter(&self, timer: TimerNumber, segment: Segment) -> u32 {
        let tmr = &self.timer(timer).tmr;
        match segment {
            Segment::A => tmr.read(TMR::CTTMRA),
            Segment::B => tmr.read(TMR::CTTMRB),
        }
    }
}

impl CtimerControl for Ctimer<'_> {
    fn configure(
        &self,
        timer: TimerNumber,
        segment: Segment,
        function: TimerFunction,
        clock: ClockSelect,
    ) {
        let ctrl = segment.ctrl();
        self.timer(timer).ctrl.modify(
            ctrl.en.val(0)
                + ctrl.clk.val(clock as u32)
                + ctrl.function.val(function as u32)
                + ctrl.ie0.val(0)
                + ctrl.ie1.val(0)
                + ctrl.clr.val(0)
                + ctrl.pol.val(0),
        );
    }

    fn start(&self, timer: TimerNumber, segment: Segment) {
        let ctrl = segment.ctrl();
        self.timer(timer)
            .ctrl
            .modify(ctrl.clr.val(0) + ctrl.en.val(1));
    }

    fn stop(&self, timer: TimerNumber, segment: Segment) {
        self.timer(timer).ctrl.modify(segment.ctrl().en.val(0));
    }

    fn clear(&self, timer: TimerNumber, segment: Segment) {
        self.timer(timer).ctrl.modify(segment.ctrl().clr.val(1));
    }

    fn set_period(&self, timer: TimerNumber, segment: Segment, period: u32, on_time: u32) {
        // The output goes high when the counter reaches CMPR0 and the
        // period ends at CMPR1.
        let value = CMPR::CMPR0.val(period.wrapping_sub(on_time)) + CMPR::CMPR1.val(period);
        let regs = self.timer(timer);
        match segment {
            Segment::A => regs.cmpra.write(value),
            Segment::B => regs.cmprb.write(value),
        }
    }

    fn configure_output(
        &self,
        timer: TimerNumber,
        segment: Segment,
        pad: usize,
        output: OutputType,
        drive: DriveStrength,
    ) -> Result<(), ErrorCode> {
        let pad_ctx = ctimer_routing::pad_context(pad).ok_or(ErrorCode::INVAL)?;

        let outcfg = match output {
            OutputType::Force0 => 0,
            OutputType::Force1 => 1,
            OutputType::Normal | OutputType::Secondary => {
                let output = OutputConfig {
                    timer,
                    segment,
                    output: if output == OutputType::Normal {
                        OutputSlot::Primary
                    } else {
                        OutputSlot::Secondary
                    },
                };
                ctimer_routing::outcfg_for(pad_ctx.ctx, output).ok_or(ErrorCode::INVAL)?
            }
        };

        self.set_outcfg(pad_ctx.ctx, outcfg);
        self.pads.configure_function(pad, pad_ctx.funcsel, drive);
        Ok(())
    }
}
