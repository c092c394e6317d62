/*
 * SalaryViz
 * Copyright (C) 2024 SalaryViz Contributors
 *
 * This program is distributed under multiple licenses.
 * Please consult the license documentation provided alongside
 * this program the details of the active license.
 */
#[macro_use]
extern crate lazy_static;

pub mod data;
pub mod encoding;
pub mod interaction;
pub mod scale;
pub mod spec;
pub mod transform;
