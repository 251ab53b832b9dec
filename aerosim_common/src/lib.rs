/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */
#![allow(unused)]

pub mod macros;
pub mod datetime;
pub mod angle;
pub mod geo;

// syntactic sugar - this is just more readable in many cases
#[inline(always)] pub fn sin(x:f64) -> f64 { x.sin() }
#[inline(always)] pub fn cos(x:f64) -> f64 { x.cos() }
#[inline(always)] pub fn rad(x:f64)->f64 { x.to_radians() }

/// clamp a value into the closed interval [min,max]. Unlike `f64::clamp` this does not panic
/// if min > max (it returns min), and it maps NaN to min
#[inline]
pub fn clamp (x: f64, min: f64, max: f64)->f64 {
    if x.is_nan() || x < min { min }
    else if x > max { max.max(min) }
    else { x }
}
