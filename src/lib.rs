//! BEM assembly - build plan generation for BEM projects
//!
//! This crate maps a project's platforms and bundle directories to a
//! declarative build graph: ordered `(tech, options)` steps per node, handed
//! to an external build engine. Template data helpers live in `bem-helper`
//! and are re-exported here.

pub mod config;
pub mod levels;
pub mod node;
pub mod plan;
pub mod techs;

pub use bem_helper as helper;
pub use config::{AssemblyOptions, ConfigError, EffectiveOptions, TaskArgs};
pub use levels::Level;
pub use node::NodeConfig;
pub use plan::{Assembler, BuildPlan, PlanError};
pub use techs::{Tech, TechStep};
