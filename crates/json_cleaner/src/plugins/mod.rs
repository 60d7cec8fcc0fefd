pub mod json_cleaner;
