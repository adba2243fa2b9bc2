mod acceptor;
mod namer;
mod types;

pub use acceptor::{MULTIPART_OVERHEAD_BYTES, UploadAcceptor};
pub use namer::{Clock, FixedClock, StorageNamer, SystemClock, extension_of, stored_file_name};
pub use types::UploadDescriptor;
