//! Maud components for standalone preview documents
//!
//! The renderer itself produces bare fragments. These components wrap a
//! fragment in a full HTML document for viewing outside the host app.

pub mod layout;
pub mod preview;
