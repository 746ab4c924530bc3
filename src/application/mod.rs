//! Application layer orchestrating the form engine.
//!
//! `FormEngine` interprets one template for one in-progress request, and
//! `RequestDesk` opens, reopens and submits those forms against a
//! `SubmissionStore`.

pub mod desk;
pub mod engine;
