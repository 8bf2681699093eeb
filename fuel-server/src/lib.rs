//! Trip fuel-cost estimation server.
//!
//! A web application that answers: "what will the fuel for this drive
//! cost?" It routes the trip, splits it into PADD fuel-price regions and
//! prices each region's share of the distance.

pub mod cache;
pub mod config;
pub mod domain;
pub mod mapbox;
pub mod pipeline;
pub mod pricing;
pub mod web;
