pub mod json_store;
