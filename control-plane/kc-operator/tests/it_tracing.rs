// Own test binary: installs the global subscriber, which would clash with
// `traced_test` in the unit tests.

#[test]
fn init_tracing_tolerates_repeat_and_bad_directive() {
    kc_operator::init_tracing("kc_operator=debug");
    kc_operator::init_tracing("not a directive ===");
    tracing::info!("tracing initialised");
}
