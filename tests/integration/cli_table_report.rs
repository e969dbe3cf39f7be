use test_support::read_fixture_text;

fn run_tables(args: &[&str]) -> String {
  let out = test_support::cmd_bin("ci-signal-report")
    .env("CSR_TEST_TESTGRID_JSON", read_fixture_text("testgrid.json"))
    .env("CSR_TEST_BOARD_PAGES_JSON", read_fixture_text("board_pages.json"))
    .args(args)
    .output()
    .unwrap();

  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  String::from_utf8(out.stdout).unwrap()
}

fn footers(out: &str) -> Vec<&str> {
  out.lines().filter(|l| l.starts_with("TOTAL: ")).collect()
}

#[test]
fn one_table_per_reporter_with_category_footer() {
  test_support::init_insta();
  let out = run_tables(&[]);

  let github_at = out.find("GITHUB REPORT").expect("github heading");
  let testgrid_at = out.find("TESTGRID REPORT").expect("testgrid heading");
  assert!(github_at < testgrid_at);

  insta::assert_snapshot!(footers(&out).join("\n"), @r"
  TOTAL: 3 | FAILING: 1 | FLAKY: 1 | RESOLVED: 1
  TOTAL: 5 | FAILING: 1 | FLAKY: 1 | PASSING: 2 | STALE: 1
  ");
}

#[test]
fn short_hides_resolved_and_passing() {
  let out = run_tables(&["--short"]);

  assert!(!out.contains("RESOLVED"));
  assert!(!out.contains("PASSING"));
  assert!(!out.contains("build-master"));
  assert!(out.contains("gce-cos-master-default"));
  assert_eq!(
    footers(&out),
    vec!["TOTAL: 2 | FAILING: 1 | FLAKY: 1", "TOTAL: 3 | FAILING: 1 | FLAKY: 1 | STALE: 1"]
  );
}

#[test]
fn table_lists_sigs_and_urls() {
  let out = run_tables(&["testgrid"]);

  assert!(!out.contains("GITHUB REPORT"));
  let flaky = out
    .lines()
    .find(|l| l.contains("ci-kubernetes-e2e-sig-node-conformance") && l.contains("FLAKY"))
    .expect("flaky row");
  assert!(flaky.contains("| node "));
  assert!(flaky.contains("https://testgrid.k8s.io/sig-release-master-blocking#ci-kubernetes-e2e-sig-node-conformance"));
}
