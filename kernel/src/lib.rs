// Licensed under the Apache License, Version 2.0 or the MIT License.
// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright Tock Contributors 2026.

//! Shared kernel types for chip drivers.
//!
//! The kernel crate holds the code that every chip crate leans on: the
//! standard error enum, the Hardware Interface Layer (HIL) traits that
//! drivers implement, and the register-access utilities.

#![no_std]

pub mod errorcode;
pub mod hil;
pub mod utilities;

pub use crate::errorcode::ErrorCode;

// This is used to run the tests on a host
#[cfg(test)]
extern crate std;
