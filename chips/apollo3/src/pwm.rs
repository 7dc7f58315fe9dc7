// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! PWM output on CTIMER segments.
//!
//! A [`CtimerPwmPin`] owns one pad. At creation the pad is resolved to the
//! timer segment that can drive it (see [`crate::ctimer_routing`]) and the
//! pad is switched over to that output. The segment then runs in repeated
//! pulse mode.
//!
//! Every period change picks the slowest counting clock from a fixed ladder
//! that still gives [`PwmConfig::resolution`] ticks per period. Pulse width
//! changes only rewrite the compare registers.
//!
//! Usage
//! -----
//!
//! ```rust,ignore
//! let pads = GpioPads::new(GPIO_BASE);
//! let ctimer = Ctimer::new(CTIMER_BASE, &pads);
//! let led = CtimerPwmPin::new(&ctimer, 23)?;
//! led.set_period_us(1000);
//! led.set_duty_cycle(0.25);
//! ```

use core::cell::Cell;

use kernel::hil;
use kernel::ErrorCode;

use crate::ctimer::{ClockSelect, CtimerControl, TimerFunction};
use crate::ctimer_routing::{self, RoutingEntry};
use crate::gpio::DriveStrength;

/// Shortest period the HIL interface can express, in microseconds.
const MIN_HIL_PERIOD_US: usize = 1;
const US_PER_S: u64 = 1_000_000;

/// Counting clocks available to a PWM segment, slowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClockSource {
    /// 1/16 Hz from the LFRC
    Lfrc1_16Hz,
    Lfrc1Hz,
    Lfrc32Hz,
    Xt256Hz,
    Xt2048Hz,
    Xt16384Hz,
    Xt32768Hz,
    Hfrc187_5kHz,
    Hfrc3MHz,
    /// Used whenever nothing slower is fast enough
    Hfrc12MHz,
}

impl ClockSource {
    pub const LADDER: [ClockSource; 10] = [
        ClockSource::Lfrc1_16Hz,
        ClockSource::Lfrc1Hz,
        ClockSource::Lfrc32Hz,
        ClockSource::Xt256Hz,
        ClockSource::Xt2048Hz,
        ClockSource::Xt16384Hz,
        ClockSource::Xt32768Hz,
        ClockSource::Hfrc187_5kHz,
        ClockSource::Hfrc3MHz,
        ClockSource::Hfrc12MHz,
    ];

    /// Frequency in sixteenths of a hertz, so every rung is an integer.
    pub const fn frequency_x16(self) -> u64 {
        match self {
            ClockSource::Lfrc1_16Hz => 1,
            ClockSource::Lfrc1Hz => 16,
            ClockSource::Lfrc32Hz => 32 * 16,
            ClockSource::Xt256Hz => 256 * 16,
            ClockSource::Xt2048Hz => 2048 * 16,
            ClockSource::Xt16384Hz => 16384 * 16,
            ClockSource::Xt32768Hz => 32768 * 16,
            ClockSource::Hfrc187_5kHz => 187_500 * 16,
            ClockSource::Hfrc3MHz => 3_000_000 * 16,
            ClockSource::Hfrc12MHz => 12_000_000 * 16,
        }
    }

    pub fn frequency_hz(self) -> f32 {
        self.frequency_x16() as f32 / 16.0
    }

    /// The CTIMER clock selector for this rung.
    pub const fn select(self) -> ClockSelect {
        match self {
            ClockSource::Lfrc1_16Hz => ClockSelect::Lfrc1_16Hz,
            ClockSource::Lfrc1Hz => ClockSelect::Lfrc1Hz,
            ClockSource::Lfrc32Hz => ClockSelect::Lfrc32Hz,
            ClockSource::Xt256Hz => ClockSelect::Xt256Hz,
            ClockSource::Xt2048Hz => ClockSelect::Xt2_048kHz,
            ClockSource::Xt16384Hz => ClockSelect::Xt16_384kHz,
            ClockSource::Xt32768Hz => ClockSelect::Xt32_768kHz,
            ClockSource::Hfrc187_5kHz => ClockSelect::Hfrc187_5kHz,
            ClockSource::Hfrc3MHz => ClockSelect::Hfrc3MHz,
            ClockSource::Hfrc12MHz => ClockSelect::Hfrc12MHz,
        }
    }

    /// Pick the slowest clock that counts at least `resolution` ticks in
    /// `period_us`, i.e. `f >= 1e6 / period_us * resolution`.
    ///
    /// The comparison is done on integers, so the 1/16 Hz rung is chosen
    /// for periods long enough to need it. A zero period, or one too short
    /// for every rung, gets the 12 MHz clock.
    pub fn for_period_us(period_us: u64, resolution: u64) -> ClockSource {
        if period_us == 0 {
            return ClockSource::Hfrc12MHz;
        }
        let needed = US_PER_S as u128 * 16 * resolution as u128;
        ClockSource::LADDER
            .iter()
            .copied()
            .find(|clock| clock.frequency_x16() as u128 * period_us as u128 >= needed)
            .unwrap_or(ClockSource::Hfrc12MHz)
    }

    /// Whole ticks of this clock in `us` microseconds, saturating at
    /// `u32::MAX`.
    pub fn ticks(self, us: u64) -> u32 {
        let ticks = self.frequency_x16() as u128 * us as u128 / (16 * US_PER_S as u128);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

/// Per-pin settings fixed at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmConfig {
    /// Minimum number of clock ticks per period when picking a clock.
    pub resolution: u32,
    pub drive_strength: DriveStrength,
}

impl PwmConfig {
    pub const DEFAULT: PwmConfig = PwmConfig {
        resolution: 256,
        drive_strength: DriveStrength::Ma12,
    };
}

impl Default for PwmConfig {
    fn default() -> Self {
        PwmConfig::DEFAULT
    }
}

/// A pad driven by a CTIMER segment in repeated pulse mode.
pub struct CtimerPwmPin<'a, C: CtimerControl> {
    ctimer: &'a C,
    pad: usize,
    routing: RoutingEntry,
    config: PwmConfig,
    period_us: Cell<i32>,
    // None until a pulse width is given or derived from the first period.
    pulse_width_us: Cell<Option<i32>>,
    clock: Cell<Option<ClockSource>>,
}

impl<'a, C: CtimerControl> CtimerPwmPin<'a, C> {
    /// Bind `pad` with [`PwmConfig::DEFAULT`].
    ///
    /// Fails with `INVAL` if no timer output can reach the pad.
    pub fn new(ctimer: &'a C, pad: usize) -> Result<Self, ErrorCode> {
        Self::new_with_config(ctimer, pad, PwmConfig::DEFAULT)
    }

    pub fn new_with_config(
        ctimer: &'a C,
        pad: usize,
        config: PwmConfig,
    ) -> Result<Self, ErrorCode> {
        let routing = ctimer_routing::resolve(pad).ok_or_else(|| {
            log::warn!("pwm: pad {} has no CTIMER output", pad);
            ErrorCode::INVAL
        })?;

        ctimer.configure_output(
            routing.timer,
            routing.segment,
            pad,
            routing.output.into(),
            config.drive_strength,
        )?;
        log::debug!(
            "pwm: pad {} on {:?} segment {:?} {:?}",
            pad,
            routing.timer,
            routing.segment,
            routing.output
        );

        Ok(CtimerPwmPin {
            ctimer,
            pad,
            routing,
            config,
            period_us: Cell::new(0),
            pulse_width_us: Cell::new(None),
            clock: Cell::new(None),
        })
    }

    pub fn pad(&self) -> usize {
        self.pad
    }

    pub fn routing(&self) -> RoutingEntry {
        self.routing
    }

    /// The counting clock, once a period has been set.
    pub fn clock_source(&self) -> Option<ClockSource> {
        self.clock.get()
    }

    /// Set the period, reselect the clock and restart the segment.
    ///
    /// If no pulse width has been set yet it defaults to half the period.
    pub fn set_period_us(&self, us: i32) {
        if self.pulse_width_us.get().is_none() {
            self.pulse_width_us.set(Some(us / 2));
        }
        self.period_us.set(us);

        // A negative period selects like a zero one, the 12 MHz fallback.
        let clock =
            ClockSource::for_period_us(non_negative(us), self.config.resolution as u64);
        log::debug!("pwm: pad {} period {}us on {:?}", self.pad, us, clock);
        self.clock.set(Some(clock));

        let RoutingEntry { timer, segment, .. } = self.routing;
        self.ctimer
            .configure(timer, segment, TimerFunction::PwmRepeat, clock.select());
        self.ctimer.start(timer, segment);
        self.update_compare(clock);
    }

    pub fn set_period_ms(&self, ms: i32) {
        self.set_period_us(ms.saturating_mul(1000));
    }

    pub fn set_period_s(&self, seconds: f32) {
        self.set_period_us((seconds * 1_000_000.0) as i32);
    }

    /// Set the pulse width. The clock is left alone.
    ///
    /// A width longer than the period is programmed as given.
    pub fn set_pulse_width_us(&self, us: i32) {
        self.pulse_width_us.set(Some(us));
        // Nothing is counting before the first period is set.
        if let Some(clock) = self.clock.get() {
            self.update_compare(clock);
        }
    }

    pub fn set_pulse_width_ms(&self, ms: i32) {
        self.set_pulse_width_us(ms.saturating_mul(1000));
    }

    pub fn set_pulse_width_s(&self, seconds: f32) {
        self.set_pulse_width_us((seconds * 1_000_000.0) as i32);
    }

    /// Set the pulse width as a fraction of the period, clamped to [0, 1].
    pub fn set_duty_cycle(&self, fraction: f32) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        let pulse = fraction as f64 * self.period_us.get() as f64;
        self.set_pulse_width_us(pulse as i32);
    }

    /// The pulse width as a fraction of the period, 0 if either is 0.
    pub fn read_duty_cycle(&self) -> f32 {
        let period = self.period_us.get();
        match self.pulse_width_us.get() {
            Some(pulse) if pulse != 0 && period != 0 => pulse as f32 / period as f32,
            _ => 0.0,
        }
    }

    pub fn read_period_us(&self) -> i32 {
        self.period_us.get()
    }

    /// `None` until a pulse width or a period has been set.
    pub fn read_pulse_width_us(&self) -> Option<i32> {
        self.pulse_width_us.get()
    }

    /// Stop the segment. Settings are kept and the next period set restarts
    /// the output.
    pub fn stop(&self) {
        self.ctimer.stop(self.routing.timer, self.routing.segment);
    }

    fn update_compare(&self, clock: ClockSource) {
        let period = clock.ticks(non_negative(self.period_us.get()));
        let on_time = clock.ticks(non_negative(self.pulse_width_us.get().unwrap_or(0)));
        self.ctimer
            .set_period(self.routing.timer, self.routing.segment, period, on_time);
    }
}

impl<C: CtimerControl> Drop for CtimerPwmPin<'_, C> {
    fn drop(&mut self) {
        self.ctimer.stop(self.routing.timer, self.routing.segment);
    }
}

fn non_negative(us: i32) -> u64 {
    us.max(0) as u64
}

impl<C: CtimerControl> hil::pwm::PwmPin for CtimerPwmPin<'_, C> {
    // The period is whole microseconds, so the frequency is rounded down to
    // the period it gives.
    fn start(&self, frequency_hz: usize, duty_cycle: usize) -> Result<(), ErrorCode> {
        if frequency_hz == 0 || frequency_hz > self.get_maximum_frequency_hz() {
            return Err(ErrorCode::INVAL);
        }
        let max_duty = self.get_maximum_duty_cycle();
        if duty_cycle > max_duty {
            return Err(ErrorCode::INVAL);
        }

        let period = US_PER_S / frequency_hz as u64;
        let pulse = period * duty_cycle as u64 / max_duty as u64;
        // Both are at most 1e6, well inside i32.
        self.pulse_width_us.set(Some(pulse as i32));
        self.set_period_us(period as i32);
        Ok(())
    }

    fn stop(&self) -> Result<(), ErrorCode> {
        CtimerPwmPin::stop(self);
        Ok(())
    }

    fn get_maximum_frequency_hz(&self) -> usize {
        US_PER_S as usize / MIN_HIL_PERIOD_US
    }

    fn get_maximum_duty_cycle(&self) -> usize {
        u16::MAX as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctimer::{OutputSlot, OutputType, Segment, TimerNumber};
    use core::cell::RefCell;
    use kernel::hil::pwm::PwmPin;
    use std::vec::Vec;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Call {
        Configure(TimerNumber, Segment, TimerFunction, ClockSelect),
        Start(TimerNumber, Segment),
        Stop(TimerNumber, Segment),
        Clear(TimerNumber, Segment),
        SetPeriod(TimerNumber, Segment, u32, u32),
        ConfigureOutput(TimerNumber, Segment, usize, OutputType, DriveStrength),
    }

    #[derive(Default)]
    struct MockCtimer {
        calls: RefCell<Vec<Call>>,
    }

    impl MockCtimer {
        fn take(&self) -> Vec<Call> {
            self.calls.take()
        }

        fn last_period(&self) -> Option<(u32, u32)> {
            self.calls.borrow().iter().rev().find_map(|call| match *call {
                Call::SetPeriod(_, _, period, on_time) => Some((period, on_time)),
                _ => None,
            })
        }
    }

    impl CtimerControl for MockCtimer {
        fn configure(
            &self,
            timer: TimerNumber,
            segment: Segment,
            function: TimerFunction,
            clock: ClockSelect,
        ) {
            self.calls
                .borrow_mut()
                .push(Call::Configure(timer, segment, function, clock));
        }

        fn start(&self, timer: TimerNumber, segment: Segment) {
            self.calls.borrow_mut().push(Call::Start(timer, segment));
        }

        fn stop(&self, timer: TimerNumber, segment: Segment) {
            self.calls.borrow_mut().push(Call::Stop(timer, segment));
        }

        fn clear(&self, timer: TimerNumber, segment: Segment) {
            self.calls.borrow_mut().push(Call::Clear(timer, segment));
        }

        fn set_period(&self, timer: TimerNumber, segment: Segment, period: u32, on_time: u32) {
            self.calls
                .borrow_mut()
                .push(Call::SetPeriod(timer, segment, period, on_time));
        }

        fn configure_output(
            &self,
            timer: TimerNumber,
            segment: Segment,
            pad: usize,
            output: OutputType,
            drive: DriveStrength,
        ) -> Result<(), ErrorCode> {
            self.calls
                .borrow_mut()
                .push(Call::ConfigureOutput(timer, segment, pad, output, drive));
            Ok(())
        }
    }

    use TimerNumber::Timer3;

    #[test]
    fn ladder_is_ascending() {
        for pair in ClockSource::LADDER.windows(2) {
            assert!(pair[0].frequency_x16() < pair[1].frequency_x16());
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(ClockSource::Lfrc1_16Hz.frequency_hz(), 0.0625);
        assert_eq!(ClockSource::Hfrc187_5kHz.frequency_hz(), 187_500.0);
    }

    #[test]
    fn clock_for_known_periods() {
        assert_eq!(ClockSource::for_period_us(1000, 256), ClockSource::Hfrc3MHz);
        assert_eq!(ClockSource::for_period_us(20_000, 256), ClockSource::Xt16384Hz);
        assert_eq!(ClockSource::for_period_us(1_000_000, 256), ClockSource::Xt256Hz);
        assert_eq!(ClockSource::for_period_us(8_000_000, 256), ClockSource::Lfrc32Hz);
        assert_eq!(ClockSource::for_period_us(256_000_000, 256), ClockSource::Lfrc1Hz);
        // Too short for every rung
        assert_eq!(ClockSource::for_period_us(10, 256), ClockSource::Hfrc12MHz);
        assert_eq!(ClockSource::for_period_us(0, 256), ClockSource::Hfrc12MHz);
    }

    #[test]
    fn sixteenth_hertz_rung_is_reachable() {
        // 256 ticks at 1/16 Hz take 4096 s
        assert_eq!(
            ClockSource::for_period_us(4_096_000_000, 256),
            ClockSource::Lfrc1_16Hz
        );
        assert_eq!(
            ClockSource::for_period_us(4_095_999_999, 256),
            ClockSource::Lfrc1Hz
        );
        // Out of reach of an i32 period
        assert_eq!(
            ClockSource::for_period_us(i32::MAX as u64, 256),
            ClockSource::Lfrc1Hz
        );
    }

    #[test]
    fn shorter_period_never_selects_slower_clock() {
        let periods = [
            1u64, 5, 21, 85, 100, 1000, 1365, 1366, 7812, 7813, 15_625, 20_000, 125_000,
            1_000_000, 8_000_000, 256_000_000, 2_000_000_000, 4_096_000_000, 10_000_000_000,
        ];
        for pair in periods.windows(2) {
            assert!(
                ClockSource::for_period_us(pair[0], 256)
                    >= ClockSource::for_period_us(pair[1], 256)
            );
        }
    }

    #[test]
    fn ticks_truncate_and_saturate() {
        assert_eq!(ClockSource::Hfrc3MHz.ticks(1000), 3000);
        assert_eq!(ClockSource::Hfrc187_5kHz.ticks(1), 0);
        assert_eq!(ClockSource::Hfrc187_5kHz.ticks(7), 1);
        assert_eq!(ClockSource::Lfrc1_16Hz.ticks(32_000_000), 2);
        assert_eq!(ClockSource::Hfrc12MHz.ticks(u64::MAX), u32::MAX);
    }

    #[test]
    fn new_routes_pad_with_default_drive() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();

        assert_eq!(pin.pad(), 23);
        assert_eq!(pin.routing().timer, Timer3);
        assert_eq!(pin.routing().segment, Segment::B);
        assert_eq!(pin.routing().output, OutputSlot::Primary);
        assert_eq!(pin.clock_source(), None);
        assert_eq!(pin.read_pulse_width_us(), None);
        assert_eq!(
            ctimer.take(),
            [Call::ConfigureOutput(
                Timer3,
                Segment::B,
                23,
                OutputType::Normal,
                DriveStrength::Ma12
            )]
        );
    }

    #[test]
    fn new_uses_secondary_output_and_config() {
        let ctimer = MockCtimer::default();
        let config = PwmConfig {
            resolution: 16,
            drive_strength: DriveStrength::Ma4,
        };
        let _pin = CtimerPwmPin::new_with_config(&ctimer, 4, config).unwrap();
        assert_eq!(
            ctimer.take(),
            [Call::ConfigureOutput(
                TimerNumber::Timer4,
                Segment::A,
                4,
                OutputType::Secondary,
                DriveStrength::Ma4
            )]
        );
    }

    #[test]
    fn unroutable_pad_is_rejected() {
        let ctimer = MockCtimer::default();
        assert_eq!(
            CtimerPwmPin::new(&ctimer, 0).err(),
            Some(ErrorCode::INVAL)
        );
        assert!(ctimer.take().is_empty());
    }

    #[test]
    fn first_period_defaults_pulse_to_half() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        ctimer.take();

        pin.set_period_us(1000);

        assert_eq!(pin.read_pulse_width_us(), Some(500));
        assert_eq!(pin.clock_source(), Some(ClockSource::Hfrc3MHz));
        assert_eq!(
            ctimer.take(),
            [
                Call::Configure(
                    Timer3,
                    Segment::B,
                    TimerFunction::PwmRepeat,
                    ClockSelect::Hfrc3MHz
                ),
                Call::Start(Timer3, Segment::B),
                Call::SetPeriod(Timer3, Segment::B, 3000, 1500),
            ]
        );
    }

    #[test]
    fn explicit_pulse_is_kept_across_period_changes() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_pulse_width_us(100);
        pin.set_period_us(1000);
        assert_eq!(pin.read_pulse_width_us(), Some(100));
        assert_eq!(ctimer.last_period(), Some((3000, 300)));

        pin.set_period_us(20_000);
        assert_eq!(pin.read_pulse_width_us(), Some(100));
        assert_eq!(pin.clock_source(), Some(ClockSource::Xt16384Hz));
        // 16384 * 20ms = 327.68, 16384 * 100us = 1.6384
        assert_eq!(ctimer.last_period(), Some((327, 1)));
    }

    #[test]
    fn pulse_before_period_is_only_stored() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        ctimer.take();

        pin.set_pulse_width_us(250);
        assert_eq!(pin.read_pulse_width_us(), Some(250));
        assert!(ctimer.take().is_empty());
    }

    #[test]
    fn pulse_change_does_not_reselect_clock() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_period_us(1000);
        ctimer.take();

        pin.set_pulse_width_us(200);
        assert_eq!(
            ctimer.take(),
            [Call::SetPeriod(Timer3, Segment::B, 3000, 600)]
        );
    }

    #[test]
    fn period_and_pulse_read_back_exactly() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 12).unwrap();
        for (period, pulse) in [(1, 0), (1000, 333), (20_000, 1500), (i32::MAX, 7)] {
            pin.set_period_us(period);
            pin.set_pulse_width_us(pulse);
            assert_eq!(pin.read_period_us(), period);
            assert_eq!(pin.read_pulse_width_us(), Some(pulse));
        }
    }

    #[test]
    fn period_units() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 12).unwrap();

        pin.set_period_ms(20);
        assert_eq!(pin.read_period_us(), 20_000);
        pin.set_period_s(0.5);
        assert_eq!(pin.read_period_us(), 500_000);
        pin.set_period_ms(i32::MAX);
        assert_eq!(pin.read_period_us(), i32::MAX);

        pin.set_pulse_width_ms(3);
        assert_eq!(pin.read_pulse_width_us(), Some(3000));
        pin.set_pulse_width_s(0.25);
        assert_eq!(pin.read_pulse_width_us(), Some(250_000));
    }

    #[test]
    fn duty_cycle_quarter() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_period_us(1000);

        pin.set_duty_cycle(0.25);
        assert_eq!(pin.read_pulse_width_us(), Some(250));
        assert_eq!(pin.read_duty_cycle(), 0.25);
        assert_eq!(ctimer.last_period(), Some((3000, 750)));
    }

    #[test]
    fn duty_cycle_is_clamped() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_period_us(1000);
        ctimer.take();

        pin.set_duty_cycle(-0.5);
        let below = (pin.read_pulse_width_us(), ctimer.take());
        pin.set_duty_cycle(0.0);
        let zero = (pin.read_pulse_width_us(), ctimer.take());
        assert_eq!(below, zero);
        assert_eq!(zero.0, Some(0));

        pin.set_duty_cycle(7.0);
        let above = (pin.read_pulse_width_us(), ctimer.take());
        pin.set_duty_cycle(1.0);
        let full = (pin.read_pulse_width_us(), ctimer.take());
        assert_eq!(above, full);
        assert_eq!(full.0, Some(1000));

        pin.set_duty_cycle(f32::NAN);
        assert_eq!(pin.read_pulse_width_us(), Some(0));
    }

    #[test]
    fn duty_read_is_zero_without_period_or_pulse() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        assert_eq!(pin.read_duty_cycle(), 0.0);

        pin.set_pulse_width_us(100);
        assert_eq!(pin.read_duty_cycle(), 0.0);

        pin.set_period_us(1000);
        pin.set_pulse_width_us(0);
        assert_eq!(pin.read_duty_cycle(), 0.0);

        pin.set_period_us(0);
        pin.set_pulse_width_us(100);
        assert_eq!(pin.read_duty_cycle(), 0.0);
    }

    #[test]
    fn pulse_longer_than_period_passes_through() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_period_us(1000);
        pin.set_pulse_width_us(1500);
        assert_eq!(pin.read_pulse_width_us(), Some(1500));
        assert_eq!(pin.read_duty_cycle(), 1.5);
        assert_eq!(ctimer.last_period(), Some((3000, 4500)));
    }

    #[test]
    fn non_positive_period_programs_zero_ticks() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_period_us(-5);
        assert_eq!(pin.read_period_us(), -5);
        assert_eq!(pin.clock_source(), Some(ClockSource::Hfrc12MHz));
        assert_eq!(ctimer.last_period(), Some((0, 0)));
    }

    #[test]
    fn negative_period_selects_like_zero() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        ctimer.take();

        pin.set_period_us(-1000);
        assert_eq!(pin.clock_source(), Some(ClockSource::Hfrc12MHz));
        assert_eq!(
            ctimer.take()[0],
            Call::Configure(
                Timer3,
                Segment::B,
                TimerFunction::PwmRepeat,
                ClockSelect::Hfrc12MHz
            )
        );
    }

    #[test]
    fn dropping_pin_stops_segment() {
        let ctimer = MockCtimer::default();
        {
            let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
            pin.set_period_us(1000);
            ctimer.take();
        }
        assert_eq!(ctimer.take(), [Call::Stop(Timer3, Segment::B)]);
    }

    #[test]
    fn stop_keeps_settings() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        pin.set_period_us(1000);
        ctimer.take();

        pin.stop();
        assert_eq!(ctimer.take(), [Call::Stop(Timer3, Segment::B)]);
        assert_eq!(pin.read_period_us(), 1000);
        assert_eq!(pin.read_pulse_width_us(), Some(500));
    }

    #[test]
    fn hil_start_sets_period_and_duty() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        let max = pin.get_maximum_duty_cycle();

        assert_eq!(PwmPin::start(&pin, 1000, max / 4), Ok(()));
        assert_eq!(pin.read_period_us(), 1000);
        // 65535 / 4 is a hair under a quarter
        assert_eq!(pin.read_pulse_width_us(), Some(249));

        assert_eq!(PwmPin::start(&pin, 1000, max), Ok(()));
        assert_eq!(pin.read_pulse_width_us(), Some(1000));
        assert_eq!(ctimer.last_period(), Some((3000, 3000)));

        assert_eq!(PwmPin::stop(&pin), Ok(()));
        assert_eq!(ctimer.take().last(), Some(&Call::Stop(Timer3, Segment::B)));
    }

    #[test]
    fn hil_start_rejects_bad_arguments() {
        let ctimer = MockCtimer::default();
        let pin = CtimerPwmPin::new(&ctimer, 23).unwrap();
        ctimer.take();

        let max_freq = pin.get_maximum_frequency_hz();
        assert_eq!(max_freq, 1_000_000);
        assert_eq!(PwmPin::start(&pin, 0, 0), Err(ErrorCode::INVAL));
        assert_eq!(PwmPin::start(&pin, max_freq + 1, 0), Err(ErrorCode::INVAL));
        assert_eq!(
            PwmPin::start(&pin, 1000, pin.get_maximum_duty_cycle() + 1),
            Err(ErrorCode::INVAL)
        );
        assert!(ctimer.take().is_empty());
        assert_eq!(pin.clock_source(), None);
    }
}
