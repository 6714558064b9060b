mod batch;
mod error;
mod submitter;

pub use batch::{BATCH_ID_ALPHABET, DEFAULT_BATCH_ID_LEN, generate_batch_id, generate_batch_id_with};
pub use error::SubmitError;
pub use submitter::{SubmissionReport, SubmittedJob, Submitter};
