//! Train/test feature-space alignment.
//!
//! The classifier identifies features by column position, so the test split
//! must end up with exactly the columns of the training split, in the same
//! order. Alignment happens in two fitted steps, both learnt from the
//! training split only:
//!
//! 1. the free-text attribute is expanded into one count column per token of
//!    a closed training vocabulary (tokens seen only in test are dropped);
//! 2. the expanded columns are ranked against the class and the top `k` kept,
//!    with the label column always retained as the last column.
//!
//! [`FittedAlignment`] carries the learnt state together with the schemas it
//! was fit on, and refuses to transform datasets with a different layout.

pub mod pipeline;
pub mod selection;
pub mod vocabulary;

pub use pipeline::{AlignedDatasets, AlignmentPipeline, FittedAlignment, DEFAULT_ATTRIBUTES};
pub use selection::{AttributeRanker, InfoGainRanker};
pub use vocabulary::{BagOfWords, TextVectorizer, Vocabulary, DEFAULT_MAX_VOCABULARY};
