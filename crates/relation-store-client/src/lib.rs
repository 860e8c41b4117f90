//! HTTP implementation of the relation and post stores.
//!
//! ```text
//! ToggleSynchronizer ─▶ RelationStoreClient ─▶ PUT {origin}{base}/assert/{id}
//!                                          └▶ PUT {origin}{base}/retract/{id}
//! PostEditor ─────────▶ RelationStoreClient ─▶ PUT {origin}/edit_post
//! ```
//!
//! Every request is same-origin and carries the `X-CSRFToken` header. Only the
//! status decides success; a body is read only to describe a failure.

mod client;
mod error;

pub use client::{Endpoints, RelationStoreClient, CSRF_HEADER};
pub use error::{ClientError, ClientResult};
