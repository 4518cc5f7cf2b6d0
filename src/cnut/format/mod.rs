//! Structural decoding layer for compiled bytecode images.
//!
//! This module sits between the width-dispatched primitives in
//! [`utils`](crate::cnut::utils) and the cursor API of
//! [`BinaryReader`](crate::cnut::reader::BinaryReader).
//!
//! # Module Organization
//!
//! - [`arch`]: Probes the `SQIR` signature to resolve the integer width
//! - [`string`]: Length-prefixed strings and tagged string objects
//! - [`marker`]: `PART` checkpoints between sections
//!
//! # Layout
//!
//! ```text
//! offset 0  ┌──────────────────────┐
//!           │ 2 bytes (stream head)│
//! offset 2  ├──────────────────────┤
//!           │ 'SQIR' (4 or 8 bytes)│ ← arch::detect()
//!           ├──────────────────────┤
//!           │ ... records ...      │ ← driven by the caller
//!           │ 'PART' (arch-sized)  │ ← marker::confirm()
//!           │ [len][bytes]         │ ← string::read_string()
//!           │ [tag][len][bytes]    │ ← string::read_string_object()
//!           └──────────────────────┘
//! ```

pub mod arch;
pub mod marker;
pub mod string;
