//! Delete-log rendering: text lines or JSONL records, one per removed file.

pub mod delete_log;
