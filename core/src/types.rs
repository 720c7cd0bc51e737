//! Shared primitive types used across the entire engine.

/// Age in whole years. One `advance_year` = +1.
pub type Age = u32;

/// A stable story node identifier, as authored in the catalog.
pub type NodeId = String;

/// Money in whole currency units. Never negative after any mutation.
pub type Money = i64;

/// Lower bound of every bounded stat.
pub const STAT_MIN: i32 = 0;

/// Upper bound of every bounded stat.
pub const STAT_MAX: i32 = 100;

/// Clamp a raw value into the bounded stat range.
pub fn clamp_stat(value: i32) -> i32 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Render a delta with an explicit sign for positive values.
pub fn signed(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}")
    } else {
        delta.to_string()
    }
}
