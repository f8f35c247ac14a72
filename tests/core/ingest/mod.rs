//! End-to-end ingest and query tests

mod test_ingest_query;
