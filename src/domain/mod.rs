//! Domain layer: templates, field values, the rules evaluated over them and
//! the ports the application layer persists through.

pub mod catalog;
pub mod legacy;
pub mod ports;
pub mod rules;
pub mod submission;
pub mod template;
pub mod value;
