//! ECS resources made available to systems.
//!
//! Long-lived data inserted into the world by the engine and read by
//! processors and contact rules.
//!
//! Overview
//! - `contactlog` – contacts resolved during the last step
//! - `physicsconfig` – tunable physics constants loaded from an INI file
//! - `worldtime` – simulation time and delta
pub mod contactlog;
pub mod physicsconfig;
pub mod worldtime;
