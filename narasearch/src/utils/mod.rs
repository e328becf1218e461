//! Timestamp helpers shared by the request builder, export and CLI.

pub mod timestamps;

pub use timestamps::{
    format_file_date, format_query_timestamp, now_local_minute,
    parse_local_timestamp, truncate_to_minute, TimestampError,
};
