//! Outer adapters: CSV in, CSV out.

pub mod csv;
