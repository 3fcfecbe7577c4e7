//! Page handlers: one module per page, each a set of typed operations
//! generic over the collaborator ports. Surfaces (the interactive loop and
//! the HTTP server) render inputs, invoke these on submit, and render the
//! result or the error inline.

pub mod ocr;
pub mod practice;
pub mod translate;
pub mod website;
