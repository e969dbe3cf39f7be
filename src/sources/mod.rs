// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Namespace for the external data sources (Testgrid summaries, GitHub project board)
// role: sources/namespace
// outputs: Public submodules, each isolating one remote API behind a trait seam
// invariants: Every source has an HTTP implementation and an env-fixture implementation
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod github_api;
pub mod testgrid_api;
