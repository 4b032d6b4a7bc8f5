//! Log records and query windows
//!
//! Two log endpoint generations are supported:
//! - **v1** (administrator and telephony logs): paged by ascending timestamp
//!   inside a [`LogWindow`], times in epoch seconds
//! - **v2** (authentication logs): paged by a [`CompositeCursor`], times in
//!   epoch milliseconds

mod records;
mod window;

pub use records::{
    parse_epoch_seconds, AdminLog, AuthLog, LogRecord, TelephonyLog, TIMESTAMP_FIELD,
};
pub use window::{
    epoch_millis, epoch_seconds, AuthLogPage, CompositeCursor, CursorMetadata, LogWindow,
    MAXTIME_PARAM, MINTIME_PARAM, NEXT_OFFSET_PARAM,
};

#[cfg(test)]
mod tests;
