//! Feature slices: aditivos modal, chat panel and dashboard builder.

pub mod aditivos;
pub mod chat;
pub mod dashboard;
