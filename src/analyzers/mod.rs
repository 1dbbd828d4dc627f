//! Risk-group analysis of bat landings against rat arrivals.
//!
//! This module joins the raw datasets on month, splits the rows by the
//! binary risk flag, and for each group computes descriptive statistics,
//! histogram bins and a least-squares regression of rat arrivals on bat
//! landings.

pub mod analyzer;
pub mod describe;
pub mod grouping;
pub mod histogram;
pub mod regression;
pub mod types;
pub mod utility;
