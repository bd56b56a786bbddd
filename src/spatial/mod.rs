pub mod sparse_hash;
