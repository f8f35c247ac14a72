//! Result shaping tests

mod test_shaping;
