//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so release
//! builds remain quiet. Every flag is further gated by `cfg(debug_assertions)`.

pub struct DebugFlags {
    /// Emit per-source load details (encoding used, rows skipped, entity counts).
    pub print_load_details: bool,
    /// Emit the cleaning summary (points before/after fill and filtering).
    pub print_clean_summary: bool,
    /// Emit the winning smoothing constants and SSE of each grid search pass.
    pub print_grid_search: bool,
    /// Emit timing for each request handled by the engine.
    pub print_request_timing: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_load_details: false,
    print_clean_summary: false,
    print_grid_search: false,
    print_request_timing: false,
};
