// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod activity;
pub mod point;
pub mod track;

pub use activity::{ActivityDetail, DetailBatch, Record, SummaryBatch};
pub use point::{FieldValue, Measurement, Point, WritePrecision};
pub use track::GeoTrack;
