// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Orchestrates the other layers to accomplish one goal:
// turning configured corpora into batches.
//
// Rules for this layer:
//   - No padding or sampling logic here (that's Layer 4)
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

/// Index summary and batch iteration workflows
pub mod batch_use_case;
