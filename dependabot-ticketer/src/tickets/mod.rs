//! Ticket content, labels, and run outcomes.

mod content;
mod labels;
mod status;

pub use content::{ensure_title_prefix, TicketContent, TITLE_PREFIX};
pub use labels::{derive_labels, sanitize_label, BASE_LABEL};
pub use status::{TicketReference, TicketStatus};
