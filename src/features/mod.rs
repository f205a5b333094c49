//! Feature extraction from parsed change records.
//!
//! Every record becomes one row of a fixed nine-column schema: three boolean
//! flags, four word/length counts, the tagged edit text and the class label.
//! Column order is part of the contract, since train and test datasets are
//! aligned by position further down the pipeline.

pub mod extractor;

pub use extractor::{
    edits_text, is_registered_user, raw_schema, FeatureExtractor, EDITS_TEXT, EDITS_TEXT_INDEX,
    LABEL, LABEL_INDEX, RELATION,
};
