// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Peripheral implementations for the Apollo3 MCU.

#![no_std]

pub mod ctimer;
pub mod ctimer_routing;
pub mod gpio;
pub mod pwm;

// This is used to run the tests on a host
#[cfg(test)]
extern crate std;
