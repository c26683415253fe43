//! PPTX (Office Open XML) document container backend for deck forking.
//!
//! A .pptx file is a ZIP archive of XML parts. This crate owns the
//! package: it parses the presentation's slide list, extracts slide and
//! notes text, and writes the filtered package back out.

pub mod extract;
pub mod package;

pub use package::PptxPackage;
