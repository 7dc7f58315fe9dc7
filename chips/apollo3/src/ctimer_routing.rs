// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! CTIMER output routing.
//!
//! The Apollo3 does not wire timer outputs straight to pads. Every pad that
//! can carry a timer waveform is attached to one of 32 output signals, CT0
//! to CT31, and each CTx signal has a 3-bit OUTCFG selector in the CTIMER
//! block that picks which timer output drives it. Four of the eight OUTCFG
//! values are specific to the signal; those are the four slots of
//! [`OUTCFG_TBL`].
//!
//! Resolution is a two stage lookup, pad -> CTx -> (timer, segment, output),
//! and always uses slot 0 of the signal.

use crate::ctimer::{OutputSlot, Segment, TimerNumber};
use crate::gpio::NUM_PADS;

/// Number of CTx output signals.
pub const NUM_CTX: usize = 32;

/// Number of signal-specific OUTCFG choices per CTx.
pub const NUM_SLOTS: usize = 4;

/// OUTCFG value of slot 0; slots 1-3 follow it.
const OUTCFG_SLOT_BASE: u32 = 2;

/// The pad a CTx signal is bonded to, and the pad function that selects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CtxPad {
    pub pad: usize,
    pub funcsel: u8,
}

/// The CTx signal on a pad, and the pad function that selects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PadCtx {
    pub ctx: usize,
    pub funcsel: u8,
}

/// One timer output as seen by the routing fabric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    pub timer: TimerNumber,
    pub segment: Segment,
    pub output: OutputSlot,
}

/// The timer output that drives a PWM-capable pad.
pub type RoutingEntry = OutputConfig;

const fn ctx(pad: usize, funcsel: u8) -> CtxPad {
    CtxPad { pad, funcsel }
}

const fn pad(ctx: usize, funcsel: u8) -> Option<PadCtx> {
    Some(PadCtx { ctx, funcsel })
}

const fn out(timer: u8, segment: Segment, output: OutputSlot) -> OutputConfig {
    OutputConfig {
        timer: TimerNumber::from_index(timer),
        segment,
        output,
    }
}

// AnOUT, AnOUT2, BnOUT and BnOUT2 in datasheet notation.
const fn a(timer: u8) -> OutputConfig {
    out(timer, Segment::A, OutputSlot::Primary)
}
const fn a2(timer: u8) -> OutputConfig {
    out(timer, Segment::A, OutputSlot::Secondary)
}
const fn b(timer: u8) -> OutputConfig {
    out(timer, Segment::B, OutputSlot::Primary)
}
const fn b2(timer: u8) -> OutputConfig {
    out(timer, Segment::B, OutputSlot::Secondary)
}

/// CTx -> bonded pad.
#[rustfmt::skip]
pub static CTX_TO_PAD: [CtxPad; NUM_CTX] = [
    ctx(12, 2), ctx(25, 2), ctx(13, 2), ctx(26, 2), ctx(18, 2), // CT0 - CT4
    ctx(27, 2), ctx(19, 2), ctx(28, 2), ctx(5, 7), ctx(29, 2),  // CT5 - CT9
    ctx(6, 5), ctx(30, 2), ctx(22, 2), ctx(31, 2), ctx(23, 2),  // CT10 - CT14
    ctx(32, 2), ctx(42, 2), ctx(4, 6), ctx(43, 2), ctx(7, 7),   // CT15 - CT19
    ctx(44, 2), ctx(24, 5), ctx(45, 2), ctx(33, 6), ctx(46, 2), // CT20 - CT24
    ctx(39, 2), ctx(47, 2), ctx(35, 5), ctx(48, 2), ctx(37, 7), // CT25 - CT29
    ctx(49, 2), ctx(11, 2),                                     // CT30 - CT31
];

/// Pad -> CTx signal, `None` for pads without a timer output.
#[rustfmt::skip]
pub static PAD_TO_CTX: [Option<PadCtx>; NUM_PADS] = [
    None, None, None, None, pad(17, 6),                // pads 0 - 4
    pad(8, 7), pad(10, 5), pad(19, 7), None, None,     // pads 5 - 9
    None, pad(31, 2), pad(0, 2), pad(2, 2), None,      // pads 10 - 14
    None, None, None, pad(4, 2), pad(6, 2),            // pads 15 - 19
    None, None, pad(12, 2), pad(14, 2), pad(21, 5),    // pads 20 - 24
    pad(1, 2), pad(3, 2), pad(5, 2), pad(7, 2), pad(9, 2), // pads 25 - 29
    pad(11, 2), pad(13, 2), pad(15, 2), pad(23, 6), None, // pads 30 - 34
    pad(27, 5), None, pad(29, 7), None, pad(25, 2),    // pads 35 - 39
    None, None, pad(16, 2), pad(18, 2), pad(20, 2),    // pads 40 - 44
    pad(22, 2), pad(24, 2), pad(26, 2), pad(28, 2), pad(30, 2), // pads 45 - 49
];

/// Timer outputs selectable by OUTCFG values 2 through 5 for each CTx.
pub static OUTCFG_TBL: [[OutputConfig; NUM_SLOTS]; NUM_CTX] = [
    [a(0), b2(2), a2(5), a(6)],
    [a2(0), a(0), a(5), b2(7)],
    [b(0), b2(1), b2(6), a(7)],
    [b2(0), b(0), a(1), a(6)],
    [a(1), a2(2), a2(5), b(5)],
    [a2(1), a(1), b(6), a(7)],
    [b(1), a(1), b2(5), b(7)],
    [b2(1), b(1), b(5), a(7)],
    [a(2), a2(3), a2(4), b(6)],
    [a2(2), a(2), a(4), b(0)],
    [b(2), b2(3), b2(4), a(6)],
    [b2(2), b(2), b(4), b2(5)],
    [a(3), b(1), b2(0), b2(6)],
    [a2(3), a(3), a(6), b2(4)],
    [b(3), b(1), b2(7), a(7)],
    [b2(3), b(3), a(7), a2(4)],
    [a(4), a(0), a2(0), b2(3)],
    [a2(4), b(7), a(4), a2(1)],
    [b(4), b(0), a(0), a2(3)],
    [b2(4), a(2), b(4), b2(1)],
    [a(5), a(1), a2(1), b2(2)],
    [a2(5), a(1), b(5), a2(0)],
    [b(5), a(6), a(1), a2(2)],
    [b2(5), a(7), a(5), b2(0)],
    [a(6), a(2), a(1), b2(1)],
    [b2(4), b(2), a(6), a2(2)],
    [b(6), b(2), a(5), a2(1)],
    [b2(6), a(1), b(6), b2(2)],
    [a(7), a(3), a2(5), b2(0)],
    [b2(5), a(1), a(7), a2(3)],
    [b(7), b(3), a2(4), a2(0)],
    [b2(7), a(6), b(7), b2(3)],
];

/// Look up the CTx signal bonded to `pad`.
///
/// Panics if `pad` is not a pad of the package.
pub fn pad_context(pad: usize) -> Option<PadCtx> {
    assert!(pad < NUM_PADS, "pad {} out of range", pad);
    PAD_TO_CTX[pad]
}

/// Look up the pad a CTx signal is bonded to.
pub fn context_pad(ctx: usize) -> CtxPad {
    assert!(ctx < NUM_CTX, "CT{} out of range", ctx);
    CTX_TO_PAD[ctx]
}

/// Resolve which timer output drives `pad` when it is used as a PWM pin.
///
/// Returns `None` if the pad cannot carry a timer output at all.
pub fn resolve(pad: usize) -> Option<RoutingEntry> {
    pad_context(pad).map(|entry| OUTCFG_TBL[entry.ctx][0])
}

/// The OUTCFG value that connects `output` to CTx signal `ctx`, if the
/// fabric allows it.
///
/// Values 2 to 5 come from the four per-signal slots. Values 6 and 7 route
/// A6OUT2 and A7OUT2, which every signal can select.
pub fn outcfg_for(ctx: usize, output: OutputConfig) -> Option<u32> {
    assert!(ctx < NUM_CTX, "CT{} out of range", ctx);
    if let Some(slot) = OUTCFG_TBL[ctx].iter().position(|entry| *entry == output) {
        return Some(OUTCFG_SLOT_BASE + slot as u32);
    }
    if output == a2(6) {
        Some(6)
    } else if output == a2(7) {
        Some(7)
    } else {
        None
    }
}

/// Every pad that can be used as a PWM output, in pad order.
pub fn pwm_capable_pads() -> impl Iterator<Item = (usize, RoutingEntry)> {
    (0..NUM_PADS).filter_map(|pad| resolve(pad).map(|routing| (pad, routing)))
}
