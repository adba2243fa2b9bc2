mod invoker;
mod types;

pub use invoker::{InferenceRunner, ProcessInvoker};
pub use types::{InferenceOutcome, UNKNOWN_FAILURE_DETAILS};
