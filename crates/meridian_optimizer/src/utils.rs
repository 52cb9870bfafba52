pub mod dbscan;
pub mod enumerate_idx;
pub mod newtype_index;
