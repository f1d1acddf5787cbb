//! Tests for fatal error output.

use crate::cli::report_failure;
use anyhow::Context;

#[test]
fn failure_is_written_once_with_its_causes() {
    let err = Err::<(), _>(anyhow::anyhow!("connection refused"))
        .context("download release info")
        .unwrap_err();
    let mut out = Vec::new();

    report_failure(&err, &mut out);

    let text = String::from_utf8(out).unwrap();
    assert_eq!(
        text,
        "pgeup error: download release info: connection refused\n"
    );
    assert_eq!(text.lines().count(), 1);
}
