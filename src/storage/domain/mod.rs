//! Domain types for blob storage.
//!
//! Blob references are opaque to the entity modules; they only need to be
//! resolvable again within the same [`BlobCategory`].

mod attachment;
mod category;
mod content_type;
mod error;
mod reference;

pub use attachment::{FileAttachment, StoredBlob, Upload};
pub use category::BlobCategory;
pub use content_type::{DEFAULT_CONTENT_TYPE, content_type_for};
pub use error::{BlobDomainError, ParseBlobCategoryError};
pub use reference::BlobRef;
