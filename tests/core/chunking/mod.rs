//! Windowing engine tests
//!
//! Position invariants, reserved metadata and UTF-8 safety.

mod test_multibyte;
mod test_windowing;
